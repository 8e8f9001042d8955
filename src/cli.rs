//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Kosko - Generate deployment manifests from components
#[derive(Parser, Debug)]
#[command(name = "kosko")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Working directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate manifests and print them
    Generate(commands::generate::GenerateArgs),

    /// Generate and validate manifests without printing them
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &resolve_cwd(self.cwd)?),
            Commands::Validate(args) => {
                commands::validate::execute(args, &resolve_cwd(self.cwd)?, &self.color)
            }
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Logs go to stderr; stdout is reserved for manifests.
fn init_logging(level: &str) {
    let filter = level.parse().unwrap_or(log::LevelFilter::Warn);
    let _ = env_logger::Builder::new()
        .filter_level(filter)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Resolve `--cwd` against the process working directory.
fn resolve_cwd(cwd: Option<PathBuf>) -> std::io::Result<PathBuf> {
    match cwd {
        Some(path) => std::path::absolute(path),
        None => std::env::current_dir(),
    }
}
