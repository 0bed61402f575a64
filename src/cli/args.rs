//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of the search path
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::Orientation;

/// gitgraph - lay out synthetic commit graphs
#[derive(Parser, Debug)]
#[command(name = "gitgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a script and print the diagram geometry as JSON
    #[command(
        name = "layout",
        long_about = "Apply an operation script and print the diagram geometry as JSON.\n\n\
            The output holds branch lanes, commit positions, routed paths and the \
            diagram bounds. Scripts are JSON, or TOML when the file ends in .toml.",
        after_help = "\
EXAMPLES:
    # Lay out a script left to right
    gitgraph layout history.json

    # Force bottom-to-top and print compact JSON
    gitgraph layout history.toml --orientation bt --compact"
    )]
    Layout {
        /// Operation script (JSON or TOML)
        script: PathBuf,

        /// Override the orientation chosen by the script or config
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Apply a script, verify the result, and print a commit log
    #[command(
        name = "check",
        long_about = "Apply an operation script and verify the resulting graph.\n\n\
            Prints one line per commit in creation order. Exits non-zero on the \
            first failing operation or if verification finds a problem."
    )]
    Check {
        /// Operation script (JSON or TOML)
        script: PathBuf,
    },

    /// Print the effective configuration
    #[command(
        name = "config",
        long_about = "Print the effective configuration as TOML, with every default filled in.\n\n\
            With --write, the configuration is also saved to the given path.",
        after_help = "\
EXAMPLES:
    # Show the configuration in use
    gitgraph config

    # Start a config file from the defaults
    gitgraph config --write ~/.gitgraph/config.toml"
    )]
    Config {
        /// Also write the configuration to this path
        #[arg(long)]
        write: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    gitgraph completion bash >> ~/.bashrc

    # Zsh
    gitgraph completion zsh > ~/.zfunc/_gitgraph"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Orientation as accepted on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationArg {
    Lr,
    Tb,
    Bt,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Lr => Orientation::LR,
            OrientationArg::Tb => Orientation::TB,
            OrientationArg::Bt => Orientation::BT,
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
