//! Rendering generated manifests.
//!
//! - YAML: one document per manifest, separated by `---`.
//! - JSON: a single Kubernetes `List` whose `items` are the manifests.

use std::io::Write;

use serde_json::json;

use crate::error::Result;
use crate::generate::GenerateResult;

/// Output format for [`print`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintFormat {
    #[default]
    Yaml,
    Json,
}

/// Write the manifests of `result` to `writer` in `format`.
pub fn print<W: Write>(result: &GenerateResult, format: PrintFormat, writer: &mut W) -> Result<()> {
    match format {
        PrintFormat::Yaml => {
            for (i, manifest) in result.manifests.iter().enumerate() {
                if i > 0 {
                    writeln!(writer, "---")?;
                }
                writer.write_all(serde_yaml::to_string(&manifest.data)?.as_bytes())?;
            }
        }
        PrintFormat::Json => {
            let items: Vec<_> = result.manifests.iter().map(|m| &m.data).collect();
            let list = json!({
                "apiVersion": "v1",
                "kind": "List",
                "items": items,
            });
            serde_json::to_writer_pretty(&mut *writer, &list)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}
