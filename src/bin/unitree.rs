//! unitree CLI Binary
//!
//! Command-line interface for browsing a lazily loaded tree backend.

use clap::Parser;
use std::process;
use tracing::{debug, error};
use unitree::cli::{Cli, RunContext};
use unitree::config::ConfigLoader;
use unitree::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    debug!("unitree CLI starting");

    let context = match RunContext::new(
        cli.workspace.clone(),
        cli.config.clone(),
        cli.base_url.clone(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing CLI context: {}", e);
            eprintln!("{}", unitree::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}", unitree::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and configuration files.
/// Precedence: CLI flags override config files override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut loader = ConfigLoader::new(cli.workspace.clone());
    if let Some(ref path) = cli.config {
        loader = loader.file(path.clone());
    }
    let mut config = loader.build().map(|c| c.logging).unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
