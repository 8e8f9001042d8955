//! Executable components.
//!
//! A command component is a script run as a child process. It receives the
//! environment context through `KOSKO_*` variables and prints its manifests
//! on standard output, either as JSON or as a YAML stream. A non-zero exit
//! status fails the load, carrying whatever the script wrote to stderr.
//!
//! Scripts are run through the interpreter mapped to their extension. Only
//! `sh` is mapped by default; more can be added with
//! [`CommandLoader::with_interpreter`].
//!
//! ## Validation
//!
//! Every document a script exports carries a validator. Validating a
//! document runs the script again with `KOSKO_VALIDATE=1`, `KOSKO_INDEX` set
//! to the document's position, and the document as JSON on stdin:
//!
//! - a non-zero exit fails validation with the script's stderr;
//! - empty stdout keeps the document unchanged;
//! - stdout holding a single document replaces the data;
//! - stdout holding several documents replaces the data with the one at
//!   `KOSKO_INDEX`, so a script that ignores `KOSKO_VALIDATE` validates as-is.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;
use serde_json::Value;

use super::data::parse_yaml_documents;
use super::Loader;
use crate::defaults;
use crate::environment::{component_name, Environment};
use crate::error::{BoxError, Error, Result};
use crate::export::{Document, Export};
use crate::validate::Validator;

/// Runs script components through an interpreter chosen by extension.
#[derive(Debug, Clone)]
pub struct CommandLoader {
    interpreters: Vec<(String, String)>,
}

impl Default for CommandLoader {
    fn default() -> Self {
        Self {
            interpreters: vec![("sh".to_string(), defaults::SHELL.to_string())],
        }
    }
}

impl CommandLoader {
    /// A loader with no interpreters mapped.
    pub fn empty() -> Self {
        Self {
            interpreters: Vec::new(),
        }
    }

    /// Run files ending in `.{extension}` with `program`.
    ///
    /// Re-mapping an extension replaces its interpreter.
    pub fn with_interpreter(mut self, extension: &str, program: &str) -> Self {
        self.interpreters.retain(|(ext, _)| ext != extension);
        self.interpreters
            .push((extension.to_string(), program.to_string()));
        self
    }

    /// Build the command that runs `path`.
    ///
    /// Files with a mapped extension are passed to their interpreter; any
    /// other file is executed directly.
    pub fn command(&self, path: &Path) -> Command {
        let interpreter = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| {
                self.interpreters
                    .iter()
                    .find(|(candidate, _)| candidate == ext)
            })
            .map(|(_, program)| program);

        match interpreter {
            Some(program) => {
                let mut cmd = Command::new(program);
                cmd.arg(path);
                cmd
            }
            None => Command::new(path),
        }
    }
}

impl Loader for CommandLoader {
    fn extensions(&self) -> Vec<String> {
        self.interpreters.iter().map(|(ext, _)| ext.clone()).collect()
    }

    fn load(&self, path: &Path, env: &Environment) -> Result<Export> {
        let component = component_name(path);
        let vars = env
            .variables(component.as_deref())
            .map_err(|e| Error::load(path, e))?;

        let mut cmd = self.script(path, &vars);
        cmd.stdin(Stdio::null());
        debug!("Running {:?}", cmd);
        let output = cmd.output().map_err(|e| Error::load(path, e))?;

        if !output.status.success() {
            return Err(Error::load(path, failure(&output)));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| Error::load(path, e))?;
        let export = parse_output(&stdout).map_err(|e| Error::load(path, e))?;

        let check = ScriptCheck {
            loader: self.clone(),
            path: path.to_path_buf(),
            vars,
        };
        Ok(check.attach(export))
    }
}

impl CommandLoader {
    fn script(&self, path: &Path, vars: &[(String, String)]) -> Command {
        let mut cmd = self.command(path);
        if let Some(dir) = path.parent() {
            cmd.current_dir(dir);
        }
        cmd.envs(vars.iter().map(|(key, value)| (key, value)));
        cmd
    }
}

fn failure(output: &std::process::Output) -> String {
    format!(
        "{}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
    )
}

/// Re-runs a script in validation mode.
#[derive(Clone)]
struct ScriptCheck {
    loader: CommandLoader,
    path: PathBuf,
    vars: Vec<(String, String)>,
}

impl ScriptCheck {
    fn attach(&self, export: Export) -> Export {
        match export {
            Export::Value(doc) => Export::Value(self.document(doc, 0)),
            Export::Sequence(docs) => Export::Sequence(
                docs.into_iter()
                    .enumerate()
                    .map(|(index, doc)| self.document(doc, index))
                    .collect(),
            ),
            Export::Default(inner) => Export::Default(Box::new(self.attach(*inner))),
            other => other,
        }
    }

    fn document(&self, doc: Document, index: usize) -> Document {
        let check = self.clone();
        doc.with_validator(Validator::sync(move |data| check.run(data, index)))
    }

    fn run(&self, data: &mut Value, index: usize) -> std::result::Result<(), BoxError> {
        let mut cmd = self.loader.script(&self.path, &self.vars);
        cmd.env("KOSKO_VALIDATE", "1")
            .env("KOSKO_INDEX", index.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("Validating {} [{}]", self.path.display(), index);
        let mut child = cmd.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            let input = serde_json::to_vec(&*data)?;
            match stdin.write_all(&input) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(failure(&output).into());
        }

        let stdout = String::from_utf8(output.stdout)?;
        if stdout.trim().is_empty() {
            return Ok(());
        }
        let mut docs = documents(parse_output(&stdout)?);
        let replacement = if docs.len() == 1 {
            docs.remove(0)
        } else if index < docs.len() {
            docs.swap_remove(index)
        } else {
            return Err(format!(
                "validation output has {} document(s), none at index {}",
                docs.len(),
                index
            )
            .into());
        };
        *data = replacement;
        Ok(())
    }
}

/// The data of an export parsed from script output.
fn documents(export: Export) -> Vec<Value> {
    match export {
        Export::Value(doc) => vec![doc.data],
        Export::Sequence(docs) => docs.into_iter().map(|doc| doc.data).collect(),
        Export::Default(inner) => documents(*inner),
        Export::Thunk(call) => documents(call()),
        // parsed output is never pending
        Export::Pending(_) => Vec::new(),
    }
}

/// Interpret a component's standard output.
///
/// Output starting with `{` or `[` is JSON; anything else is read as a YAML
/// stream, so empty output exports nothing.
fn parse_output(stdout: &str) -> std::result::Result<Export, String> {
    let trimmed = stdout.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str::<Value>(trimmed)
            .map(Export::from_value)
            .map_err(|e| e.to_string())
    } else {
        parse_yaml_documents(stdout).map_err(|e| e.to_string())
    }
}
