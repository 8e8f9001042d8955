//! # Validate Command Implementation
//!
//! `kosko validate` generates manifests with validation enabled and reports
//! the outcome instead of printing the manifests. It stops at the first
//! manifest that fails validation.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use kosko::error::Error;
use kosko::output::{OutputConfig, Status};

use super::generate::{run, ComponentArgs};

/// Validate manifests without printing them
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub components: ComponentArgs,
}

/// Execute the `validate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `cwd` - The working directory
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: ValidateArgs, cwd: &Path, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    match run(&args.components, cwd, true) {
        Ok(result) => {
            for manifest in &result.manifests {
                println!(
                    "{}",
                    out.status(
                        Status::Info,
                        format!("{} [{}]", manifest.path.display(), manifest.index)
                    )
                );
            }
            println!(
                "{}",
                out.status(
                    Status::Ok,
                    format!("{} manifest(s) are valid", result.manifests.len())
                )
            );
            Ok(())
        }
        Err(e) => {
            if let Some(Error::Validation { path, index, .. }) = e.downcast_ref::<Error>() {
                println!(
                    "{}",
                    out.status(
                        Status::Error,
                        format!("{} [{}] is invalid", path.display(), index)
                    )
                );
            }
            Err(e)
        }
    }
}
