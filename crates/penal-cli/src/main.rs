mod commands;
mod config;
mod output;
mod telemetry;

use clap::{Parser, Subcommand};
use penal_core::AdditionStacking;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "penal",
    version,
    about = "Sentence, fine and bail calculator for arrest reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate sentences and totals for an arrest report (JSON request)
    Calculate {
        /// Path to the request JSON, or "-" to read stdin
        request: PathBuf,

        /// Custom legal code JSON file
        #[arg(short, long = "codes", value_name = "FILE", conflicts_with = "preset")]
        codes: Option<PathBuf>,

        /// Built-in legal code (default: sample)
        #[arg(short, long = "preset", value_name = "NAME")]
        preset: Option<String>,

        /// Custom additions catalog JSON file
        #[arg(short, long = "additions", value_name = "FILE")]
        additions: Option<PathBuf>,

        /// Treat the suspect as a parole violator regardless of the request
        #[arg(long)]
        parole: bool,

        /// Override the sentence cap in days
        #[arg(long, value_name = "DAYS", value_parser = config::parse_days)]
        max_sentence_days: Option<Decimal>,

        /// How the parole addition combines with a charge's addition: multiply, replace, display-only
        #[arg(long, value_name = "POLICY")]
        stacking: Option<AdditionStacking>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show per-charge lookups and applied additions
        #[arg(long)]
        verbose: bool,
    },
    /// Inspect and validate legal codes
    Codes {
        #[command(subcommand)]
        action: CodesAction,
    },
    /// List the addition catalog
    Additions {
        /// Custom additions catalog JSON file
        #[arg(short, long = "additions", value_name = "FILE")]
        additions: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CodesAction {
    /// List built-in legal codes
    List,
    /// Explain one charge in plain language
    Explain {
        /// Charge id (e.g., "102")
        id: String,

        /// Custom legal code JSON file
        #[arg(short, long = "codes", value_name = "FILE", conflicts_with = "preset")]
        codes: Option<PathBuf>,

        /// Built-in legal code (default: sample)
        #[arg(short, long = "preset", value_name = "NAME")]
        preset: Option<String>,
    },
    /// Validate a legal code file and report lint warnings
    Validate {
        /// Path to legal code JSON file
        file: PathBuf,
    },
    /// Print the legal code JSON format with an example
    Schema,
}

fn main() {
    let cli = Cli::parse();

    let config = match config::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = telemetry::init(&config.telemetry) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Calculate {
            request,
            codes,
            preset,
            additions,
            parole,
            max_sentence_days,
            stacking,
            output,
            verbose,
        } => {
            let mut options = config.engine;
            if let Some(days) = max_sentence_days {
                options.limits.max_sentence_days = days;
            }
            if let Some(stacking) = stacking {
                options.stacking = stacking;
            }
            commands::calculate::run(commands::calculate::CalculateArgs {
                request,
                codes,
                preset,
                additions,
                parole,
                options,
                output,
                verbose,
            })
        }
        Commands::Codes { action } => match action {
            CodesAction::List => commands::codes::list(),
            CodesAction::Explain { id, codes, preset } => {
                commands::codes::explain(&id, codes.as_deref(), preset.as_deref())
            }
            CodesAction::Validate { file } => commands::codes::validate(&file),
            CodesAction::Schema => commands::codes::schema(),
        },
        Commands::Additions { additions } => {
            commands::additions::list(additions.as_deref(), &config.engine.parole_addition)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
