//! # Project Configuration
//!
//! This module defines the `kosko.toml` schema and how it is combined with
//! the selected environment.
//!
//! ```toml
//! components = ["*"]
//! require = ["./setup.sh"]
//! extensions = ["json", "yaml"]
//!
//! [environments.dev]
//! components = ["debug-tools"]
//! require = ["./dev-setup.sh"]
//!
//! [paths.environment]
//! global = "environments/#{environment}"
//! component = "environments/#{environment}/#{component}"
//! ```
//!
//! Every key is optional. Environment-specific lists are appended to the
//! top-level ones.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::environment::EnvironmentPaths;
use crate::error::{Error, Result};

/// The contents of `kosko.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Component patterns generated when none are given on the command line.
    pub components: Vec<String>,
    /// Commands run, in order, before components are loaded.
    pub require: Vec<String>,
    /// Candidate extensions overriding the runtime's list.
    pub extensions: Vec<String>,
    /// Per-environment additions.
    pub environments: BTreeMap<String, EnvironmentConfig>,
    /// Path templates.
    pub paths: PathsConfig,
}

/// Additions applied when an environment is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub components: Vec<String>,
    pub require: Vec<String>,
}

/// The `[paths]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub environment: EnvironmentPaths,
}

/// The configuration that applies to one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub components: Vec<String>,
    pub require: Vec<String>,
    pub extensions: Vec<String>,
}

impl Config {
    /// Combine the top-level settings with those of `environment`.
    ///
    /// An environment without a table of its own adds nothing.
    pub fn for_environment(&self, environment: Option<&str>) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            components: self.components.clone(),
            require: self.require.clone(),
            extensions: self.extensions.clone(),
        };
        if let Some(env) = environment.and_then(|name| self.environments.get(name)) {
            effective.components.extend(env.components.iter().cloned());
            effective.require.extend(env.require.iter().cloned());
        }
        effective
    }
}

/// Parse the contents of a `kosko.toml` file.
pub fn parse(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| Error::ConfigParse {
        message: e.message().to_string(),
        hint: Some(format!(
            "check {} against the documented keys: components, require, extensions, environments, paths",
            defaults::CONFIG_FILE
        )),
    })
}

/// Parse a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Load `kosko.toml` from `cwd`, or the default configuration if there is
/// none.
pub fn load(cwd: &Path) -> Result<Config> {
    let path = cwd.join(defaults::CONFIG_FILE);
    if path.is_file() {
        from_file(path)
    } else {
        Ok(Config::default())
    }
}
