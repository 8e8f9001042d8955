//! # CLI Command Implementations
//!
//! Each subcommand of `kosko` lives in its own file with:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `kosko` library.

pub mod completions;
pub mod generate;
pub mod validate;
