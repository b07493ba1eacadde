//! # obscura CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Obscura confidential ledger harness.
///
/// Validates ledger configurations and runs scripted scenarios against an
/// in-process ledger with the mock encryption backend.
#[derive(Parser, Debug)]
#[command(name = "obscura", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Parse and validate a ledger configuration.
    ValidateConfig(obscura_cli::validate::ValidateArgs),
    /// Run a scenario file and print the report.
    Run(obscura_cli::scenario::RunArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON output.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::ValidateConfig(args) => {
            let config = obscura_cli::validate::execute(&args)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run(args) => {
            let report = obscura_cli::scenario::execute(&args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
