//! Running `require` entries before generation.
//!
//! Each entry is a command run once, in order, with the environment context
//! exposed through `KOSKO_*` variables. An entry naming a file relative to
//! the working directory runs that file, through its interpreter when one is
//! mapped for its extension; any other entry is looked up on `PATH`.

use std::process::Stdio;

use log::{debug, info};

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::loader::CommandLoader;

/// Run every entry of `ids` in order, stopping at the first failure.
pub fn preload(ids: &[String], env: &Environment, commands: &CommandLoader) -> Result<()> {
    for id in ids {
        let local = env.cwd.join(id);
        let mut cmd = if local.is_file() {
            commands.command(&local)
        } else {
            std::process::Command::new(id)
        };
        cmd.current_dir(&env.cwd)
            .envs(env.variables(None)?)
            .stdin(Stdio::null());

        debug!("Requiring {}: {:?}", id, cmd);
        let output = cmd.output().map_err(|e| Error::Preload {
            id: id.clone(),
            message: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(Error::Preload {
                id: id.clone(),
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
    }

    if !ids.is_empty() {
        info!("Required {} module(s)", ids.len());
    }
    Ok(())
}
