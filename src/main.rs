use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use schema_recover::parser::ColumnSplit;
use schema_recover::{recover_many, InputKind, RecoverOptions, DEFAULT_MAX_INPUT_BYTES};

#[derive(Parser)]
#[command(name = "schema-recover")]
#[command(author, version, about = "Recover database schemas from CSV, SQL DDL and LLM output")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Reject inputs larger than this many bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    max_input_bytes: usize,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize CSV files and infer a schema from the header and first row
    Csv {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Field delimiter (defaults to the sep= hint or auto-detection)
        #[arg(short, long)]
        delimiter: Option<char>,
    },
    /// Read tables and columns from CREATE TABLE statements
    Sql {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// How table bodies are split into column definitions
        #[arg(long, value_enum, default_value_t = SplitArg::Naive)]
        split: SplitArg,
    },
    /// Extract JSON values from free-form text
    Json {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Extract JSON and normalize its field definitions
    Fields {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Pick the parser from each file's extension
    Auto {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SplitArg {
    /// Split on every comma
    Naive,
    /// Split only on commas outside parentheses and strings
    ParenDepth,
}

impl From<SplitArg> for ColumnSplit {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Naive => ColumnSplit::Naive,
            SplitArg::ParenDepth => ColumnSplit::ParenDepth,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let build = |inputs: Vec<PathBuf>, kind: Option<InputKind>| -> Vec<RecoverOptions> {
        inputs
            .into_iter()
            .map(|path| {
                let kind = kind.unwrap_or_else(|| InputKind::from_path(&path));
                let mut options = RecoverOptions::new(path, kind);
                options.max_input_bytes = cli.max_input_bytes;
                options
            })
            .collect()
    };

    let options = match cli.command {
        Commands::Csv { inputs, delimiter } => {
            let mut options = build(inputs, Some(InputKind::Csv));
            options.iter_mut().for_each(|o| o.delimiter = delimiter);
            options
        }
        Commands::Sql { inputs, split } => {
            let mut options = build(inputs, Some(InputKind::Sql));
            options.iter_mut().for_each(|o| o.column_split = split.into());
            options
        }
        Commands::Json { inputs } => build(inputs, Some(InputKind::Json)),
        Commands::Fields { inputs } => build(inputs, Some(InputKind::Fields)),
        Commands::Auto { inputs } => build(inputs, None),
    };

    let mut failed = false;
    for (opts, result) in options.iter().zip(recover_many(&options)) {
        match result {
            Ok(recovered) => {
                println!("{}", serde_json::to_string_pretty(&recovered)?);
            }
            Err(e) => {
                failed = true;
                eprintln!("{}: {:#}", opts.input_path.display(), e);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
