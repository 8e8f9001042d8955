//! # Kosko
//!
//! Generate deployment manifests from components: small units of code or
//! data living in a components directory. Point the generator at that
//! directory and a list of name patterns; it finds the matching component
//! files, runs them, and returns every manifest they export, tagged with the
//! file it came from and its position in that file's output.
//!
//! ## Quick Example
//!
//! ```no_run
//! use kosko::environment::Environment;
//! use kosko::generate::{generate_blocking, GenerateOptions};
//! use kosko::loader::Runtime;
//!
//! let options = GenerateOptions::new("/srv/app/components", ["nginx", "db*"]);
//! let env = Environment::new("/srv/app").with_name(Some("dev".into()));
//! let result = generate_blocking(&options, &Runtime::builtin(), &env).unwrap();
//! for manifest in &result.manifests {
//!     println!("{} [{}]", manifest.path.display(), manifest.index);
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1.  **Resolution (`resolve`)**: each pattern becomes zero or more files,
//!     trying candidate extensions in priority order and descending into
//!     directories through their `index` file.
//! 2.  **Loading (`loader`)**: the [`loader::Runtime`] runs each file with the
//!     loader registered for its extension. Built-in loaders read JSON, YAML
//!     and TOML data and run shell scripts; custom loaders plug in through the
//!     [`loader::Loader`] trait.
//! 3.  **Normalization (`export`)**: whatever a component exports (a value, a
//!     sequence, a deferred or asynchronous computation) is reduced to an
//!     ordered list of documents.
//! 4.  **Validation (`validate`)**: documents carrying a validation capability
//!     are checked, and may rewrite themselves, when validation is requested.
//! 5.  **Assembly (`generate`)**: manifests are collected in pattern order,
//!     then file order, then output order.
//!
//! Around the pipeline, `config` reads `kosko.toml`, `environment` provides
//! the variables components are parameterised with, `preload` runs `require`
//! entries, and `print` renders the result as YAML or JSON.

pub mod config;
pub mod defaults;
pub mod environment;
pub mod error;
pub mod export;
pub mod generate;
pub mod loader;
pub mod output;
pub mod preload;
pub mod print;
pub mod resolve;
pub mod validate;

#[cfg(test)]
mod generate_proptest;
