//! # Error Handling
//!
//! This module defines the centralized error type for `kosko`. It uses
//! `thiserror` to describe every failure the generation pipeline can surface,
//! with enough context (pattern, path, index) for a caller to report the
//! problem without re-deriving it.
//!
//! ## Error Kinds
//!
//! - **Input**: [`Error::NoComponents`] is raised before any filesystem access
//!   when the pattern list is empty.
//! - **Output**: [`Error::NoManifests`] is raised once the whole pipeline has
//!   finished and nothing was exported.
//! - **Load**: [`Error::Load`] and [`Error::UnsupportedExtension`] identify the
//!   component file that could not be executed.
//! - **Validation**: [`Error::Validation`] carries the manifest's path and index
//!   together with the underlying cause.
//!
//! The remaining variants wrap configuration, preload, and I/O failures.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error used as the cause of component and validation failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for kosko operations
#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied an empty pattern list.
    #[error("No components are given")]
    NoComponents,

    /// Every pattern resolved and loaded, but no manifest was produced.
    #[error("No manifests are exported")]
    NoManifests,

    /// A component file failed to execute or to produce a value.
    #[error("Failed to load component {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// A resolved component has an extension that no loader handles.
    #[error("No loader is registered for {}", path.display())]
    UnsupportedExtension { path: PathBuf },

    /// A manifest's validation capability failed.
    ///
    /// Distinct from [`Error::Load`] so callers can report "this manifest
    /// failed validation" separately from a crashing component.
    #[error("Validation failed for {} [{index}]: {source}", path.display())]
    Validation {
        path: PathBuf,
        index: usize,
        #[source]
        source: BoxError,
    },

    /// A component pattern is not a valid glob.
    #[error("Invalid component pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    /// An error occurred while parsing `kosko.toml`.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An environment file could not be read or parsed.
    #[error("Failed to read environment file {}: {message}", path.display())]
    Environment { path: PathBuf, message: String },

    /// A `require` entry could not be run or exited unsuccessfully.
    #[error("Failed to require {id}: {message}")]
    Preload { id: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Build a load error for `path` from any displayable cause.
    pub fn load(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Error::Load {
            path: path.into(),
            message: cause.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
