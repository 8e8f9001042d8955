//! # Output Configuration
//!
//! Status lines written by the `validate` command use emoji markers when the
//! terminal supports colour and plain bracketed tags otherwise. Manifests
//! themselves are never decorated.
//!
//! Colour is decided by the `--color` flag (`always`, `never`, `auto`). In
//! auto mode it is disabled by `NO_COLOR`, `CLICOLOR=0`, `TERM=dumb`, or a
//! non-terminal stdout, and forced by `CLICOLOR_FORCE=1`.

use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

/// Kinds of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    Info,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Marker prefixed to a status line.
    pub fn marker(&self, status: Status) -> &'static str {
        match (status, self.use_color) {
            (Status::Ok, true) => "✅",
            (Status::Ok, false) => "[OK]",
            (Status::Error, true) => "❌",
            (Status::Error, false) => "[ERR]",
            (Status::Info, true) => "📦",
            (Status::Info, false) => "[INFO]",
        }
    }

    /// Format a status line.
    pub fn status(&self, status: Status, message: impl std::fmt::Display) -> String {
        format!("{} {}", self.marker(status), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_plain_markers() {
        let config = OutputConfig { use_color: false };
        assert_eq!(config.status(Status::Ok, "valid"), "[OK] valid");
        assert_eq!(config.marker(Status::Error), "[ERR]");
    }

    #[test]
    fn test_emoji_markers() {
        let config = OutputConfig { use_color: true };
        assert_eq!(config.marker(Status::Ok), "✅");
    }
}
