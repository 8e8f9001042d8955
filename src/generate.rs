//! # Manifest Generation
//!
//! [`generate`] is the entry point of the pipeline. For each pattern, in the
//! order given, it resolves component files; for each file, in resolution
//! order, it loads the component, normalizes the export into documents and
//! tags every document with the file's path and its position in that file's
//! output. When validation is requested each manifest is validated as soon as
//! it is produced, and the first failure aborts the run.
//!
//! The run fails with [`Error::NoComponents`] before touching the filesystem
//! when no pattern is given, and with [`Error::NoManifests`] when the
//! pipeline completes without producing anything.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::export::normalize;
use crate::loader::Runtime;
use crate::resolve::resolve_with;
use crate::validate::validate;

/// Options for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Component patterns, processed in order.
    pub components: Vec<String>,
    /// Directory patterns are resolved against.
    pub path: PathBuf,
    /// Candidate extensions in priority order. Empty means the runtime's
    /// extension list.
    pub extensions: Vec<String>,
    /// Whether to run each manifest's validation capability.
    pub validate: bool,
}

impl GenerateOptions {
    pub fn new<I, S>(path: impl Into<PathBuf>, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

/// One generated manifest and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    /// Component file that produced the manifest.
    pub path: PathBuf,
    /// Position within that file's output, starting at 0 for every file.
    pub index: usize,
    /// The manifest itself.
    pub data: Value,
}

/// The ordered output of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateResult {
    pub manifests: Vec<Manifest>,
}

/// Generate manifests from the components matching `options.components`.
pub async fn generate(
    options: &GenerateOptions,
    runtime: &Runtime,
    env: &Environment,
) -> Result<GenerateResult> {
    if options.components.is_empty() {
        return Err(Error::NoComponents);
    }

    let root = std::path::absolute(&options.path)?;
    let loadable = runtime.extensions();
    let extensions = if options.extensions.is_empty() {
        loadable.clone()
    } else {
        options.extensions.clone()
    };
    debug!(
        "Generating {:?} under {} with extensions {:?}",
        options.components,
        root.display(),
        extensions
    );

    let mut manifests = Vec::new();
    for pattern in &options.components {
        for path in resolve_with(&root, pattern, &extensions, &loadable)? {
            load_component(&path, runtime, env, options.validate, &mut manifests).await?;
        }
    }

    if manifests.is_empty() {
        return Err(Error::NoManifests);
    }

    info!("Generated {} manifest(s)", manifests.len());
    Ok(GenerateResult { manifests })
}

/// Synchronous wrapper around [`generate`].
pub fn generate_blocking(
    options: &GenerateOptions,
    runtime: &Runtime,
    env: &Environment,
) -> Result<GenerateResult> {
    futures::executor::block_on(generate(options, runtime, env))
}

async fn load_component(
    path: &Path,
    runtime: &Runtime,
    env: &Environment,
    validate_manifests: bool,
    manifests: &mut Vec<Manifest>,
) -> Result<()> {
    let export = runtime.load(path, env)?;
    let documents = normalize(export)
        .await
        .map_err(|e| Error::load(path, e))?;
    debug!("{} exported {} document(s)", path.display(), documents.len());

    for (index, document) in documents.into_iter().enumerate() {
        let mut manifest = Manifest {
            path: path.to_path_buf(),
            index,
            data: document.data,
        };
        if validate_manifests {
            validate(&mut manifest, document.validator).await?;
        }
        manifests.push(manifest);
    }

    Ok(())
}
