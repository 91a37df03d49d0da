//! mdpub CLI - publish Markdown files to Confluence Cloud.
//!
//! Provides commands for:
//! - `publish`: Create or update one page per matched Markdown file
//! - `convert`: Print the storage markup of a single file without publishing

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, PublishArgs};
use output::Output;

/// mdpub - Markdown to Confluence publisher.
#[derive(Parser)]
#[command(name = "mdpub", version, about)]
struct Cli {
    /// Verbose logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish matched Markdown files to a Confluence space.
    Publish(PublishArgs),
    /// Convert one Markdown file and print the result.
    Convert(ConvertArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Publish(args) => args.execute(&output),
        Commands::Convert(args) => args.execute(&output),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            output.error(&err.to_string());
            err.exit_code()
        }
    }
}
