//! Default values for kosko configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Name of the project configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "kosko.toml";

/// Directory, relative to the working directory, that holds components.
pub const COMPONENTS_DIR: &str = "components";

/// Placeholder replaced by the environment name in path templates.
pub const ENVIRONMENT_PLACEHOLDER: &str = "#{environment}";

/// Placeholder replaced by the component name in path templates.
pub const COMPONENT_PLACEHOLDER: &str = "#{component}";

/// Default template for the global environment file.
pub const GLOBAL_ENVIRONMENT_PATH: &str = "environments/#{environment}";

/// Default template for per-component environment files.
pub const COMPONENT_ENVIRONMENT_PATH: &str = "environments/#{environment}/#{component}";

/// Extensions tried when loading environment files, in priority order.
pub const ENVIRONMENT_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml"];

/// Default interpreter for shell components.
pub const SHELL: &str = "sh";
