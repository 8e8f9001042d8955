//! # Environment Context
//!
//! Components read their parameters from an [`Environment`]: the working
//! directory, the selected environment name, and where that environment's
//! variable files live. The context is built once per run and handed to every
//! loader explicitly; nothing is stored in process-wide state.
//!
//! Variable files are static data (`json`, `yaml`, `yml`, `toml`) located by
//! path templates:
//!
//! - global: `environments/#{environment}` (a file, or a directory `index`)
//! - component: `environments/#{environment}/#{component}`
//!
//! Component variables are the global variables deep-merged with the
//! component's own file, the component's values taking precedence.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults;
use crate::error::Result;
use crate::loader::data::read_value;
use crate::resolve::resolve;

/// Path templates for environment variable files, relative to the working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentPaths {
    pub global: String,
    pub component: String,
}

impl Default for EnvironmentPaths {
    fn default() -> Self {
        Self {
            global: defaults::GLOBAL_ENVIRONMENT_PATH.to_string(),
            component: defaults::COMPONENT_ENVIRONMENT_PATH.to_string(),
        }
    }
}

/// The context components are executed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Working directory of the run.
    pub cwd: PathBuf,
    /// Selected environment, if any.
    pub name: Option<String>,
    /// Where variable files are looked up.
    pub paths: EnvironmentPaths,
}

impl Environment {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            name: None,
            paths: EnvironmentPaths::default(),
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_paths(mut self, paths: EnvironmentPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Variables shared by every component.
    ///
    /// Empty when no environment is selected or no file exists.
    pub fn global(&self) -> Result<Value> {
        match &self.name {
            Some(name) => self.read_template(&self.paths.global, name, None),
            None => Ok(empty()),
        }
    }

    /// Variables for `component`, merged over the global ones.
    pub fn component(&self, component: &str) -> Result<Value> {
        let Some(name) = &self.name else {
            return Ok(empty());
        };
        let mut merged = self.global()?;
        let own = self.read_template(&self.paths.component, name, Some(component))?;
        merge_values(&mut merged, own);
        Ok(merged)
    }

    /// Process environment variables exposing this context to a child
    /// process. Component variables are included when `component` is given.
    pub fn variables(&self, component: Option<&str>) -> Result<Vec<(String, String)>> {
        let mut vars = vec![("KOSKO_CWD".to_string(), self.cwd.display().to_string())];
        if let Some(name) = &self.name {
            vars.push(("KOSKO_ENV".to_string(), name.clone()));
        }
        if let Some(component) = component {
            vars.push(("KOSKO_COMPONENT".to_string(), component.to_string()));
            let params = self.component(component)?;
            vars.push(("KOSKO_PARAMS".to_string(), params.to_string()));
        }
        Ok(vars)
    }

    fn read_template(&self, template: &str, name: &str, component: Option<&str>) -> Result<Value> {
        let mut relative = template.replace(defaults::ENVIRONMENT_PLACEHOLDER, name);
        if let Some(component) = component {
            relative = relative.replace(defaults::COMPONENT_PLACEHOLDER, component);
        }

        let extensions: Vec<String> = defaults::ENVIRONMENT_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .collect();
        match resolve(&self.cwd, &relative, &extensions)?.first() {
            Some(path) => {
                debug!("Reading environment file {}", path.display());
                read_value(path)
            }
            None => Ok(empty()),
        }
    }
}

/// The component name a file stands for: its stem, or the name of its
/// directory for `index` files.
pub fn component_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem == "index" {
        let dir = path.parent()?.file_name()?.to_str()?;
        Some(dir.to_string())
    } else {
        Some(stem.to_string())
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}

/// Deep-merge `source` into `target`.
///
/// Objects merge key by key; any other value in `source` replaces the
/// corresponding value in `target`.
pub fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_values(existing, value)
                    }
                    _ => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_without_name_everything_is_empty() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "environments/dev.json", r#"{"a": 1}"#);
        let env = Environment::new(temp.path());
        assert_eq!(env.global().unwrap(), json!({}));
        assert_eq!(env.component("web").unwrap(), json!({}));
    }

    #[test]
    fn test_global_from_directory_index() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "environments/dev/index.yaml", "registry: example.com/\n");
        let env = Environment::new(temp.path()).with_name(Some("dev".into()));
        assert_eq!(env.global().unwrap(), json!({"registry": "example.com/"}));
    }

    #[test]
    fn test_component_merges_over_global() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "environments/dev/index.json",
            r#"{"registry": "a/", "labels": {"team": "x", "tier": "web"}}"#,
        );
        write(
            temp.path(),
            "environments/dev/web.toml",
            "replicas = 2\n[labels]\ntier = \"front\"\n",
        );
        let env = Environment::new(temp.path()).with_name(Some("dev".into()));
        assert_eq!(
            env.component("web").unwrap(),
            json!({
                "registry": "a/",
                "replicas": 2,
                "labels": {"team": "x", "tier": "front"}
            })
        );
    }

    #[test]
    fn test_missing_component_file_falls_back_to_global() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "environments/dev.json", r#"{"a": 1}"#);
        let env = Environment::new(temp.path()).with_name(Some("dev".into()));
        assert_eq!(env.component("db").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_custom_paths() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "vars/prod/web.json", r#"{"replicas": 5}"#);
        let env = Environment::new(temp.path())
            .with_name(Some("prod".into()))
            .with_paths(EnvironmentPaths {
                global: "vars/#{environment}/_global".into(),
                component: "vars/#{environment}/#{component}".into(),
            });
        assert_eq!(env.component("web").unwrap(), json!({"replicas": 5}));
    }

    #[test]
    fn test_variables() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "environments/dev/web.json", r#"{"replicas": 1}"#);
        let env = Environment::new(temp.path()).with_name(Some("dev".into()));

        let vars = env.variables(Some("web")).unwrap();
        let get = |key: &str| vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());
        assert_eq!(get("KOSKO_ENV").as_deref(), Some("dev"));
        assert_eq!(get("KOSKO_COMPONENT").as_deref(), Some("web"));
        assert_eq!(get("KOSKO_PARAMS").as_deref(), Some(r#"{"replicas":1}"#));

        let vars = env.variables(None).unwrap();
        assert!(vars.iter().all(|(k, _)| k != "KOSKO_PARAMS"));
    }

    #[test]
    fn test_component_name() {
        assert_eq!(component_name(Path::new("/c/web.sh")).as_deref(), Some("web"));
        assert_eq!(component_name(Path::new("/c/db/index.json")).as_deref(), Some("db"));
    }

    #[test]
    fn test_merge_replaces_arrays_and_scalars() {
        let mut target = json!({"list": [1, 2], "n": 1, "obj": {"a": 1}});
        merge_values(&mut target, json!({"list": [3], "n": {"x": 1}, "obj": {"b": 2}}));
        assert_eq!(target, json!({"list": [3], "n": {"x": 1}, "obj": {"a": 1, "b": 2}}));
    }
}
