//! Document formats accepted for catalogs and templates.

use std::path::Path;

use serde_json::Value;

/// Serialization format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` are YAML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }

    /// Parse `content` into a JSON value tree.
    pub fn parse(self, content: &str) -> Result<Value, String> {
        match self {
            DocumentFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))
            }
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))
            }
        }
    }
}
