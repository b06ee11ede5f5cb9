//! maptrace CLI - Command-line interface
//!
//! File-based front end over the maptrace numeric core: calibrate a
//! reference frame from matched pairs, reorder route waypoints, and project
//! single points in either direction.

mod cli;
mod commands;
mod config_loader;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute the command
    commands::execute(cli)
}
