//! PDL template documents.
//!
//! A document is a YAML file whose `defs` mapping holds named template
//! definitions:
//!
//! ```yaml
//! description: Story prompts
//! defs:
//!   intro:
//!     text:
//!       - "Once upon a time, ${ hero } "
//!       - model: ollama/granite3.2
//! ```
//!
//! Definitions are kept as raw YAML values; interpreting them is the
//! engine's job.

use crate::error::{BridgeError, Result};
use serde_yaml::{Mapping, Value};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};

/// Resolve a template document path against the project root.
///
/// Absolute paths are used verbatim. Relative paths are joined to
/// `project_root`, dropping `.` components so `./prompts/a.pdl` and
/// `prompts/a.pdl` resolve to the same file.
pub fn resolve_template_path(project_root: &Path, pdl_file: &Path) -> PathBuf {
    if pdl_file.is_absolute() {
        return pdl_file.to_path_buf();
    }

    let mut resolved = project_root.to_path_buf();
    for component in pdl_file.components() {
        if component != Component::CurDir {
            resolved.push(component);
        }
    }
    resolved
}

/// A loaded template document.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    path: PathBuf,
    defs: Mapping,
}

impl TemplateDocument {
    /// Load and parse a document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            IoErrorKind::NotFound => BridgeError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => BridgeError::Internal(format!(
                "failed to read PDL file '{}': {}",
                path.display(),
                e
            )),
        })?;

        let mut document = Self::from_yaml(&content)?;
        document.path = path.to_path_buf();
        Ok(document)
    }

    /// Parse a document from YAML text.
    ///
    /// An empty document and a document without `defs` both have no templates.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(yaml).map_err(|e| BridgeError::Yaml(e.to_string()))?;

        let defs = match root {
            Value::Null => Mapping::new(),
            Value::Mapping(mut root) => match root.remove("defs") {
                None | Some(Value::Null) => Mapping::new(),
                Some(Value::Mapping(defs)) => defs,
                Some(_) => {
                    return Err(BridgeError::Yaml(
                        "'defs' must be a mapping of template names to definitions".to_string(),
                    ));
                }
            },
            _ => {
                return Err(BridgeError::Yaml(
                    "PDL document must be a mapping at the top level".to_string(),
                ));
            }
        };

        Ok(Self {
            path: PathBuf::new(),
            defs,
        })
    }

    /// Path the document was loaded from (empty when parsed from text).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a template definition by name.
    pub fn definition(&self, name: &str) -> Result<&Value> {
        self.defs
            .get(name)
            .ok_or_else(|| BridgeError::TemplateNotFound(name.to_string()))
    }

    /// Template names in document order. Non-string keys are skipped.
    pub fn template_names(&self) -> Vec<String> {
        self.defs
            .iter()
            .filter_map(|(key, _)| key.as_str())
            .map(str::to_string)
            .collect()
    }
}
