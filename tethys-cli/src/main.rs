use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use tethys_core::TethysError;

fn main() {
    let cli = Cli::parse();

    // Verbosity flags raise the default level; TETHYS_LOG overrides both
    let log_level = std::env::var("TETHYS_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Exit codes tell operators which layer failed
        let exit_code = match e.downcast_ref::<TethysError>() {
            Some(TethysError::Configuration(_)) => 2,
            Some(TethysError::Io(_)) => 3,
            Some(TethysError::Parse(_)) | Some(TethysError::HitTableParse { .. }) => 4,
            Some(TethysError::Storage(_))
            | Some(TethysError::StoreMissing { .. })
            | Some(TethysError::StoreVersion { .. }) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Annotate(args) => crate::cli::commands::annotate::run(args),
        Commands::Store { command } => crate::cli::commands::store::run(command),
    }
}
