//! # Path Extraction
//!
//! Reduces a binding expression to the property path it reads, tried by
//! shape:
//!
//! 1. `attribute` — the path itself.
//! 2. `xpath(<literal>)` — the literal's text, bound against the root
//!    type's namespace table.
//! 3. `function` — the first argument, left to right, that yields a path.
//!    All other arguments are ignored.
//! 4. `literal` — no path.

use thiserror::Error;
use tplv_core::{Expression, NamespaceTable, PathError, PropertyPath};

/// An expression whose shape cannot be reduced to a path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The path text itself is malformed or uses an unbound prefix.
    #[error(transparent)]
    Path(#[from] PathError),

    /// `xpath(...)` was called with something other than a literal.
    #[error("xpath() expects a literal property path, found '{0}'")]
    WrapperArgument(String),
}

/// Canonicalizes expressions against one namespace table.
#[derive(Debug, Clone, Copy)]
pub struct PathExtractor<'n> {
    namespaces: &'n NamespaceTable,
}

impl<'n> PathExtractor<'n> {
    pub fn new(namespaces: &'n NamespaceTable) -> Self {
        Self { namespaces }
    }

    /// Reduce `expression` to a property path.
    ///
    /// `Ok(None)` means the expression reads no property at all.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError` for a malformed path anywhere in the
    /// expression, and for an `xpath()` call over a non-literal argument.
    /// Arguments after the first resolvable one are never inspected.
    pub fn canonicalize(&self, expression: &Expression) -> Result<Option<PropertyPath>, ExtractError> {
        match expression {
            Expression::Attribute(path) => Ok(Some(PropertyPath::parse(path)?)),
            Expression::XPath(arg) => match arg.as_ref() {
                Expression::Literal(lit) => {
                    let path = PropertyPath::bind(&lit.to_string(), self.namespaces)?;
                    tracing::trace!(path = %path, "bound xpath() literal");
                    Ok(Some(path))
                }
                other => Err(ExtractError::WrapperArgument(other.to_string())),
            },
            Expression::Function { name, args } => {
                for arg in args {
                    if let Some(path) = self.canonicalize(arg)? {
                        tracing::trace!(function = %name, path = %path, "function argument selected");
                        return Ok(Some(path));
                    }
                }
                Ok(None)
            }
            Expression::Literal(_) => Ok(None),
        }
    }
}
