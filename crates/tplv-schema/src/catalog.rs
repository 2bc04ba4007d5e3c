//! # Catalog Documents
//!
//! Builds a [`SchemaCatalog`] from a YAML or JSON catalog document.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tplv_core::{NamespaceTable, SchemaCatalog, SchemaType};

use crate::document::DocumentError;
use crate::format::DocumentFormat;

/// On-disk shape of a schema catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    #[serde(default)]
    pub namespaces: NamespaceTable,
    #[serde(default)]
    pub types: Vec<SchemaType>,
}

impl CatalogDocument {
    /// Register every declared type.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Catalog` for duplicate types or properties.
    pub fn into_catalog(self, document: &str) -> Result<SchemaCatalog, DocumentError> {
        let mut catalog = SchemaCatalog::new(self.namespaces);
        for schema_type in self.types {
            catalog
                .register(schema_type)
                .map_err(|source| DocumentError::Catalog {
                    path: document.to_string(),
                    source,
                })?;
        }
        Ok(catalog)
    }
}

/// Parse a catalog held in memory. `document` names it in errors.
pub fn parse_catalog(
    document: &str,
    content: &str,
    format: DocumentFormat,
) -> Result<SchemaCatalog, DocumentError> {
    let value = format
        .parse(content)
        .map_err(|reason| DocumentError::DocumentLoad {
            path: document.to_string(),
            reason,
        })?;
    let doc: CatalogDocument =
        serde_json::from_value(value).map_err(|e| DocumentError::DocumentLoad {
            path: document.to_string(),
            reason: format!("invalid catalog: {e}"),
        })?;
    doc.into_catalog(document)
}

/// Read a catalog file. The format follows the file extension.
pub fn load_catalog(path: &Path) -> Result<SchemaCatalog, DocumentError> {
    let document = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| DocumentError::DocumentLoad {
        path: document.clone(),
        reason: format!("cannot read file: {e}"),
    })?;
    let catalog = parse_catalog(&document, &content, DocumentFormat::from_path(path))?;
    tracing::debug!(
        document = %document,
        types = catalog.len(),
        namespaces = catalog.namespace_table().len(),
        "loaded schema catalog"
    );
    Ok(catalog)
}
