//! Static data components.
//!
//! JSON, YAML and TOML files export their parsed contents. A top-level array
//! exports one manifest per element, and a YAML file with several documents
//! exports one manifest per document.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::Loader;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::export::{Document, Export};

/// Loads `.json` components.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

/// Loads `.yaml` and `.yml` components.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLoader;

/// Loads `.toml` components.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlLoader;

impl Loader for JsonLoader {
    fn extensions(&self) -> Vec<String> {
        vec!["json".to_string()]
    }

    fn load(&self, path: &Path, _env: &Environment) -> Result<Export> {
        let content = read(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| Error::load(path, e))?;
        Ok(Export::from_value(value))
    }
}

impl Loader for YamlLoader {
    fn extensions(&self) -> Vec<String> {
        vec!["yaml".to_string(), "yml".to_string()]
    }

    fn load(&self, path: &Path, _env: &Environment) -> Result<Export> {
        let content = read(path)?;
        parse_yaml_documents(&content).map_err(|e| Error::load(path, e))
    }
}

impl Loader for TomlLoader {
    fn extensions(&self) -> Vec<String> {
        vec!["toml".to_string()]
    }

    fn load(&self, path: &Path, _env: &Environment) -> Result<Export> {
        let content = read(path)?;
        let value: Value = toml::from_str(&content).map_err(|e| Error::load(path, e))?;
        Ok(Export::from_value(value))
    }
}

/// Parse a YAML stream into an export.
///
/// A single document is exported as-is; several documents become a
/// sequence, one manifest per document. An empty stream exports nothing.
pub fn parse_yaml_documents(content: &str) -> std::result::Result<Export, serde_yaml::Error> {
    let mut documents = serde_yaml::Deserializer::from_str(content)
        .map(|document| serde_yaml::Value::deserialize(document).map(yaml_to_json))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(match documents.len() {
        0 => Export::Sequence(Vec::new()),
        1 => Export::from_value(documents.remove(0)),
        _ => Export::Sequence(documents.into_iter().map(Document::new).collect()),
    })
}

/// Convert a YAML value into the JSON data model.
///
/// Mapping keys that are not strings (`80: http`) are rendered as strings,
/// and tags (`!Ref name`) are dropped in favour of the tagged value.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (mapping_key(key), yaml_to_json(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn mapping_key(key: serde_yaml::Value) -> String {
    match yaml_to_json(key) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Read a data file into a plain value, choosing the format by extension.
///
/// Used for environment files, which are always static data. Failures name
/// the file.
pub fn read_value(path: &Path) -> Result<Value> {
    let environment_error = |message: String| Error::Environment {
        path: path.to_path_buf(),
        message,
    };
    let content = fs::read_to_string(path).map_err(|e| environment_error(e.to_string()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| environment_error(e.to_string())),
        Some("yaml") | Some("yml") => serde_yaml::from_str::<serde_yaml::Value>(&content)
            .map(yaml_to_json)
            .map_err(|e| environment_error(e.to_string())),
        Some("toml") => toml::from_str(&content).map_err(|e| environment_error(e.to_string())),
        _ => Err(Error::UnsupportedExtension {
            path: path.to_path_buf(),
        }),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::load(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::normalize;
    use futures::executor::block_on;
    use serde_json::json;
    use tempfile::TempDir;

    fn load_data(loader: &dyn Loader, name: &str, content: &str) -> Vec<Value> {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(name);
        fs::write(&path, content).unwrap();
        let env = Environment::new(temp.path());
        let export = loader.load(&path, &env).unwrap();
        block_on(normalize(export))
            .unwrap()
            .into_iter()
            .map(|doc| doc.data)
            .collect()
    }

    #[test]
    fn test_json_object() {
        let docs = load_data(&JsonLoader, "foo.json", r#"{"foo": "bar"}"#);
        assert_eq!(docs, vec![json!({"foo": "bar"})]);
    }

    #[test]
    fn test_json_array() {
        let docs = load_data(&JsonLoader, "foo.json", r#"[{"a": 1}, {"b": 2}]"#);
        assert_eq!(docs, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_json_default_wrapper() {
        let docs = load_data(
            &JsonLoader,
            "foo.json",
            r#"{"__esModule": true, "default": {"foo": "bar"}}"#,
        );
        assert_eq!(docs, vec![json!({"foo": "bar"})]);
    }

    #[test]
    fn test_json_syntax_error_is_load_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        let err = JsonLoader
            .load(&path, &Environment::new(temp.path()))
            .unwrap_err();
        match err {
            Error::Load { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn test_yaml_multi_document() {
        let docs = load_data(
            &YamlLoader,
            "app.yaml",
            "kind: Deployment\n---\nkind: Service\n",
        );
        assert_eq!(docs, vec![json!({"kind": "Deployment"}), json!({"kind": "Service"})]);
    }

    #[test]
    fn test_yaml_single_list_document() {
        let docs = load_data(&YamlLoader, "app.yml", "- a: 1\n- b: 2\n");
        assert_eq!(docs, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_yaml_empty_stream() {
        let docs = load_data(&YamlLoader, "empty.yaml", "");
        assert!(docs.is_empty());
    }

    #[test]
    fn test_toml_table() {
        let docs = load_data(&TomlLoader, "app.toml", "kind = \"ConfigMap\"\n[data]\nkey = \"value\"\n");
        assert_eq!(docs, vec![json!({"kind": "ConfigMap", "data": {"key": "value"}})]);
    }

    #[test]
    fn test_yaml_non_string_keys_become_strings() {
        let docs = load_data(
            &YamlLoader,
            "svc.yaml",
            "ports:\n  80: http\n  true: on\nratio: 0.5\n",
        );
        assert_eq!(
            docs,
            vec![json!({"ports": {"80": "http", "true": "on"}, "ratio": 0.5})]
        );
    }

    #[test]
    fn test_yaml_tags_are_dropped() {
        let docs = load_data(&YamlLoader, "cfn.yaml", "bucket: !Ref MyBucket\n");
        assert_eq!(docs, vec![json!({"bucket": "MyBucket"})]);
    }

    #[test]
    fn test_read_value_syntax_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("web.json");
        fs::write(&path, "{ broken").unwrap();
        match read_value(&path).unwrap_err() {
            Error::Environment { path: failed, message } => {
                assert_eq!(failed, path);
                assert!(message.contains("key must be a string"));
            }
            other => panic!("expected environment error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_value_by_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("params.yaml");
        fs::write(&path, "replicas: 2\n").unwrap();
        assert_eq!(read_value(&path).unwrap(), json!({"replicas": 2}));
    }
}
