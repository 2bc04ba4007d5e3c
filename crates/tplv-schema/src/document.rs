//! # Template Documents
//!
//! Loads template trees from YAML or JSON. Each document is first checked
//! against the template JSON Schema (Draft 2020-12); only a structurally
//! valid document is handed to serde.

use std::fmt::{self, Write as _};
use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;
use tplv_core::{SchemaError, TemplateNode};

use crate::format::DocumentFormat;

/// The template document schema shipped with this crate.
pub const TEMPLATE_SCHEMA: &str = include_str!("../../../schemas/template.schema.json");

/// Error while loading a catalog or template document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document does not have the shape of a template tree.
    #[error("document '{document}' is not a valid template: {violations}")]
    ValidationFailed {
        document: String,
        violations: Violations,
    },

    /// The template schema could not be read or parsed.
    #[error("template schema load error for '{schema_name}': {reason}")]
    SchemaLoad { schema_name: String, reason: String },

    /// The template schema parsed but could not be compiled.
    #[error("template schema build error for '{schema_name}': {reason}")]
    ValidatorBuild { schema_name: String, reason: String },

    /// The document could not be read, parsed or deserialized.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad { path: String, reason: String },

    /// A catalog document declared an inconsistent type set.
    #[error("catalog error in '{path}': {source}")]
    Catalog {
        path: String,
        #[source]
        source: SchemaError,
    },
}

/// One place where a template document departs from the template schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the rejected node; empty for the document itself.
    pub pointer: String,
    /// Schema keyword that rejected the node (`oneOf`, `required`, ...).
    pub keyword: String,
    /// Reason given by the schema validator.
    pub message: String,
}

impl Violation {
    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let schema_path = error.schema_path.to_string();
        Self {
            pointer: error.instance_path.to_string(),
            keyword: schema_path.rsplit('/').next().unwrap_or_default().to_string(),
            message: error.to_string(),
        }
    }

    /// The rejected node in tree notation, e.g. `root.children[1].source`.
    pub fn location(&self) -> String {
        let mut out = String::new();
        for segment in self.pointer.split('/').skip(1) {
            let segment = segment.replace("~1", "/").replace("~0", "~");
            if segment.parse::<usize>().is_ok() {
                let _ = write!(out, "[{segment}]");
            } else {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(&segment);
            }
        }
        if out.is_empty() {
            out.push_str("document");
        }
        out
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.location(), self.message, self.keyword)
    }
}

/// Every structural violation found in one document, in validator order.
#[derive(Debug, Clone, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} structural violation(s)", self.0.len())?;
        for violation in &self.0 {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

/// Loads template documents through a compiled template schema.
pub struct TemplateLoader {
    schema_name: String,
    validator: Validator,
}

impl TemplateLoader {
    /// Loader using the embedded [`TEMPLATE_SCHEMA`].
    pub fn new() -> Result<Self, DocumentError> {
        let schema: Value =
            serde_json::from_str(TEMPLATE_SCHEMA).map_err(|e| DocumentError::SchemaLoad {
                schema_name: "template.schema.json".to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;
        Self::from_schema("template.schema.json", &schema)
    }

    /// Loader using a template schema read from disk.
    pub fn from_schema_file(path: &Path) -> Result<Self, DocumentError> {
        let schema_name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::SchemaLoad {
            schema_name: schema_name.clone(),
            reason: format!("cannot read file: {e}"),
        })?;
        let schema = DocumentFormat::from_path(path)
            .parse(&content)
            .map_err(|reason| DocumentError::SchemaLoad {
                schema_name: schema_name.clone(),
                reason,
            })?;
        Self::from_schema(&schema_name, &schema)
    }

    /// Compile `schema` into a loader.
    pub fn from_schema(schema_name: &str, schema: &Value) -> Result<Self, DocumentError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts.build(schema).map_err(|e| DocumentError::ValidatorBuild {
            schema_name: schema_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            schema_name: schema_name.to_string(),
            validator,
        })
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Structural check of an already-parsed document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::ValidationFailed` listing every violation.
    pub fn check(&self, document: &str, instance: &Value) -> Result<(), DocumentError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation::from_error(&e))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(document = %document, count = violations.len(), "template document rejected");
            Err(DocumentError::ValidationFailed {
                document: document.to_string(),
                violations: Violations(violations),
            })
        }
    }

    /// Parse, check and deserialize a template held in memory.
    ///
    /// `document` names the input in error messages.
    pub fn load_str(
        &self,
        document: &str,
        content: &str,
        format: DocumentFormat,
    ) -> Result<TemplateNode, DocumentError> {
        let value = format
            .parse(content)
            .map_err(|reason| DocumentError::DocumentLoad {
                path: document.to_string(),
                reason,
            })?;
        self.check(document, &value)?;
        serde_json::from_value(value).map_err(|e| DocumentError::DocumentLoad {
            path: document.to_string(),
            reason: format!("cannot build template tree: {e}"),
        })
    }

    /// Read, check and deserialize a template file. The format follows the
    /// file extension.
    pub fn load_file(&self, path: &Path) -> Result<TemplateNode, DocumentError> {
        let document = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::DocumentLoad {
            path: document.clone(),
            reason: format!("cannot read file: {e}"),
        })?;
        let template = self.load_str(&document, &content, DocumentFormat::from_path(path))?;
        tracing::debug!(document = %document, nodes = template.node_count(), "loaded template");
        Ok(template)
    }
}

impl fmt::Debug for TemplateLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateLoader")
            .field("schema_name", &self.schema_name)
            .finish_non_exhaustive()
    }
}
