use clap::{Parser, Subcommand};
use scabbard::core::ScabbardError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "scabbard")]
#[command(about = "Compile-time dependency injection compiler")]
#[command(version)]
struct Cli {
    /// Config file (defaults to scabbard.yaml next to the input, then the global config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze declarations and print the object graph
    Analyze {
        /// Metadata file or directory of metadata files
        input: PathBuf,
    },
    /// Analyze and validate the object graph
    Validate {
        /// Metadata file or directory of metadata files
        input: PathBuf,
    },
    /// Validate the object graph and emit generated classes
    Generate {
        /// Metadata file or directory of metadata files
        input: PathBuf,
        /// Output directory (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = cli::GlobalOptions { config: cli.config };

    let result = match cli.command {
        Commands::Analyze { input } => cli::analyze::run(&input, &options),
        Commands::Validate { input } => cli::validate::run(&input, &options),
        Commands::Generate { input, output } => {
            cli::generate::run(&input, output.as_deref(), &options)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", format_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn format_error(error: &ScabbardError) -> String {
    let hint = match error {
        ScabbardError::Validation { .. } => Some("Fix the errors listed above and run again."),
        ScabbardError::Metadata(_) | ScabbardError::Yaml(_) => {
            Some("Check the metadata input against the declaration format.")
        }
        ScabbardError::Config(_) => Some("Check scabbard.yaml or the file passed with --config."),
        _ => None,
    };
    match hint {
        Some(hint) => format!("Error: {}\n  help: {}", error, hint),
        None => format!("Error: {}", error),
    }
}
