//! Command-line harness for coursepath.
//!
//! Reads a JSON dataset and an optional TOML configuration, builds the
//! catalog and either runs a recommendation policy (`run`) or prints a
//! summary of the dataset (`inspect`).

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod dataset;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::{execute_inspect, execute_run};
use crate::config::{load_config, DatasetSettings, RunSettings};

/// Entry point of the `coursepath` binary.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = load_config(args.dataset.config.as_deref())?.unwrap_or_default();
            let settings = RunSettings::resolve(&args, &config)?;
            tracing::debug!(target: "coursepath::run", ?settings, "Resolved settings");

            let written = execute_run(&settings)?;
            println!(
                "Wrote {} report(s) to {}",
                written.len(),
                settings.results_dir.display()
            );
        }
        Commands::Inspect(args) => {
            let config = load_config(args.config.as_deref())?.unwrap_or_default();
            let settings = DatasetSettings::resolve(&args, &config)?;
            println!("{}", execute_inspect(&settings)?);
        }
    }
    Ok(())
}
