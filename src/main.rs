//! ego - development supervisor for ego web applications.

mod actor;
mod build;
mod cli;
mod config;
mod core;
mod diagnostic;
mod inspector;
mod logger;
mod proxy;
mod supervisor;
mod template;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{DevConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(DevConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve()?,
        Commands::Inspect { pretty } => cli::inspect::inspect(&config, *pretty)?,
        Commands::Build => cli::build::build(&config)?,
    }

    match core::exit_code() {
        0 => Ok(()),
        code => std::process::exit(code),
    }
}
