//! return-check command line entry point.
//!
//! One-shot barcode lookups against the same cache and registry the MCP
//! server uses. JSON payloads go to stdout, logs to stderr.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod checksum;
mod lookup;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(name = "return-check")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a barcode is part of the deposit return scheme.
    Lookup(lookup::LookupArgs),
    /// Validate a barcode's GS1 check digit offline.
    Checksum(checksum::ChecksumArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup(lookup) => lookup.run().await,
        Commands::Checksum(checksum) => checksum.run(),
    }
}
