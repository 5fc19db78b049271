//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Development supervisor for ego web applications
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: ego.toml, optional)
    #[arg(short = 'C', long, default_value = "ego.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch, rebuild and proxy the application
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },

    /// Print the actions discovered in the controllers directory
    #[command(visible_alias = "i")]
    Inspect {
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Generate and compile the server once, without running it
    #[command(visible_alias = "b")]
    Build,
}

/// Serve command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Network interface for the public proxy (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Public port the proxy listens on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Local port the backend is started on
    #[arg(short, long)]
    pub backend_port: Option<u16>,
}
