//! # Pattern Resolution
//!
//! Turns a component pattern into the concrete files that implement it.
//!
//! A pattern is evaluated relative to the components root. Only its final
//! segment may contain glob syntax; any leading directories are taken
//! literally. Three forms are recognised:
//!
//! - **Explicit extension** (`nginx.yaml`): the literal file, if it exists.
//! - **Bare name** (`nginx`): the first of `nginx.<ext>` that exists, trying
//!   extensions in priority order, falling back to `nginx/index.<ext>`. At
//!   most one file is produced.
//! - **Wildcard** (`*`, `ng*`, `*.json`): every entry whose name matches.
//!   Matched files are kept when their extension is a candidate; matched
//!   directories contribute their first existing `index.<ext>`. A bare `*`
//!   also keeps files of any loadable extension (see [`resolve_with`]).
//!
//! A pattern that matches nothing resolves to an empty list. Overall
//! emptiness is reported by the caller once every pattern has been resolved.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::{debug, warn};

use crate::error::{Error, Result};

/// File stem probed inside matched directories.
const INDEX: &str = "index";

/// Resolve `pattern` under `root` into zero or more component files.
///
/// `extensions` are given without a leading dot; their order defines which
/// candidate wins when several sibling files share a basename.
pub fn resolve(root: &Path, pattern: &str, extensions: &[String]) -> Result<Vec<PathBuf>> {
    resolve_with(root, pattern, extensions, extensions)
}

/// Like [`resolve`], but a bare `*` keeps every matched file whose extension
/// is in `loadable`, even when it is not a candidate. Candidates still pick
/// the `index` file of matched directories.
pub fn resolve_with(
    root: &Path,
    pattern: &str,
    extensions: &[String],
    loadable: &[String],
) -> Result<Vec<PathBuf>> {
    let (dir, name) = split_pattern(root, pattern);

    let files = if is_glob(name) {
        let accepted = if name == "*" { loadable } else { extensions };
        resolve_wildcard(&dir, pattern, name, extensions, accepted)?
    } else if has_candidate_extension(Path::new(name), extensions) {
        let path = dir.join(name);
        if path.is_file() {
            vec![path]
        } else {
            Vec::new()
        }
    } else {
        probe_extensions(&dir, name, extensions)
            .or_else(|| probe_index(&dir.join(name), extensions))
            .into_iter()
            .collect()
    };

    debug!("Pattern {:?} resolved to {} file(s)", pattern, files.len());
    Ok(files)
}

/// Whether `name` contains glob metacharacters.
pub fn is_glob(name: &str) -> bool {
    name.contains(['*', '?', '['])
}

/// Split a pattern into the literal directory it applies to and the final
/// segment to match within that directory.
fn split_pattern<'a>(root: &Path, pattern: &'a str) -> (PathBuf, &'a str) {
    match pattern.rsplit_once('/') {
        Some((parent, name)) => (root.join(parent), name),
        None => (root.to_path_buf(), pattern),
    }
}

fn resolve_wildcard(
    dir: &Path,
    pattern: &str,
    name: &str,
    extensions: &[String],
    accepted: &[String],
) -> Result<Vec<PathBuf>> {
    let matcher = Pattern::new(name).map_err(|e| Error::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::default()
    };

    let mut entries = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir.collect::<std::io::Result<Vec<_>>>()?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    // read_dir order is platform dependent
    entries.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::new();
    for entry in entries {
        let file_name = entry.file_name();
        let Some(entry_name) = file_name.to_str() else {
            continue;
        };
        if !matcher.matches_with(entry_name, options) {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            if let Some(index) = probe_index(&path, extensions) {
                files.push(index);
            } else {
                warn!("Skipping {}: no index file", path.display());
            }
        } else if has_candidate_extension(&path, extensions)
            || has_candidate_extension(&path, accepted)
        {
            files.push(path);
        } else {
            debug!("Skipping {}: extension is not a candidate", path.display());
        }
    }

    Ok(files)
}

/// Return the first `dir/<name>.<ext>` that exists, in extension order.
fn probe_extensions(dir: &Path, name: &str, extensions: &[String]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|candidate| candidate.is_file())
}

/// Return the first `dir/index.<ext>` that exists, in extension order.
fn probe_index(dir: &Path, extensions: &[String]) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    probe_extensions(dir, INDEX, extensions)
}

fn has_candidate_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|candidate| candidate == ext))
}
