//! Development tasks for the status engine
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Registry, Simulate};

/// Development tasks for the status engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the status engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a scripted scenario and print what happened
    Simulate(Simulate),

    /// Print the effective effect table
    Registry(Registry),

    /// Validate a content directory
    Check(Check),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute().await,
        Command::Registry(cmd) => cmd.execute(),
        Command::Check(cmd) => cmd.execute(),
    }
}

/// Logs go to stderr so that JSON output on stdout stays clean.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
