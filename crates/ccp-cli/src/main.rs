//! CCP CLI - Main entry point

use anyhow::Result;
use ccp_cli::{commands, Cli, Commands};
use ccp_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use clap::Parser;
use std::io::{self, BufWriter};
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries command output
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("ccp-cli")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &cli.command {
        Commands::Lines(args) => commands::lines::run(args, &mut out).map(drop),
        Commands::Parse(args) => commands::parse::run(args, &mut out).map(drop),
        Commands::Unpack { archive, dest } => {
            commands::unpack::run(archive, dest, &mut out).map(drop)
        }
        Commands::Checksum { path, algorithm } => {
            commands::checksum::run(path, *algorithm, &mut out).map(drop)
        }
    }
}
