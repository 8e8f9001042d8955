//! # Component Loading
//!
//! Executing a component is delegated to a [`Loader`]. The generation
//! pipeline only depends on this trait, so how a component actually runs
//! (parsing a data file, spawning a script, calling into Rust code) is an
//! injectable choice.
//!
//! A [`Runtime`] is the ordered registry of loaders used for one run. Its
//! combined extension list, in registration order, is the default candidate
//! list for pattern resolution, and it dispatches each resolved file to the
//! loader registered for that file's extension.
//!
//! ## Built-in Loaders
//!
//! - [`CommandLoader`]: runs executable components (`sh` by default) and parses
//!   their standard output.
//! - [`JsonLoader`], [`YamlLoader`], [`TomlLoader`]: static data components.

use std::path::Path;

use log::debug;

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::export::Export;

pub mod command;
pub mod data;

pub use command::CommandLoader;
pub use data::{JsonLoader, TomlLoader, YamlLoader};

/// Executes component files of one or more extensions.
pub trait Loader: Send + Sync {
    /// Extensions handled by this loader, without a leading dot.
    fn extensions(&self) -> Vec<String>;

    /// Execute `path` and return what it exports.
    ///
    /// `env` is the context the component may read its parameters from.
    fn load(&self, path: &Path, env: &Environment) -> Result<Export>;
}

/// Ordered registry of loaders.
#[derive(Default)]
pub struct Runtime {
    loaders: Vec<Box<dyn Loader>>,
}

impl Runtime {
    /// A runtime with no loaders registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A runtime with the built-in loaders: commands first, then JSON, YAML
    /// and TOML data.
    pub fn builtin() -> Self {
        Self::builtin_with(CommandLoader::default())
    }

    /// The built-in loaders, using `command` for executable components.
    pub fn builtin_with(command: CommandLoader) -> Self {
        Self::empty()
            .with_loader(command)
            .with_loader(JsonLoader)
            .with_loader(YamlLoader)
            .with_loader(TomlLoader)
    }

    /// Register a loader after the existing ones.
    pub fn register(&mut self, loader: impl Loader + 'static) {
        self.loaders.push(Box::new(loader));
    }

    /// Builder form of [`Runtime::register`].
    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.register(loader);
        self
    }

    /// Every registered extension, first registration wins.
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = Vec::new();
        for ext in self.loaders.iter().flat_map(|loader| loader.extensions()) {
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        extensions
    }

    /// The loader responsible for `path`, by extension.
    pub fn loader_for(&self, path: &Path) -> Option<&dyn Loader> {
        let ext = path.extension()?.to_str()?;
        self.loaders
            .iter()
            .find(|loader| loader.extensions().iter().any(|e| e == ext))
            .map(|loader| loader.as_ref())
    }

    /// Execute `path` with the loader registered for its extension.
    pub fn load(&self, path: &Path, env: &Environment) -> Result<Export> {
        let loader = self
            .loader_for(path)
            .ok_or_else(|| Error::UnsupportedExtension {
                path: path.to_path_buf(),
            })?;
        debug!("Loading component {}", path.display());
        loader.load(path, env)
    }
}
