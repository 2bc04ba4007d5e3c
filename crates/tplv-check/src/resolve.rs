//! # Expression Resolution
//!
//! Checks a canonical path against the schema type of a scope. Each step is
//! matched exactly against the properties of the type the previous step
//! produced; the first step is matched against the scope's own type.
//!
//! A step's local name must equal the property's. A prefixed step must also
//! name the property's namespace, either by the same prefix or by a prefix
//! bound to the same URI. An unprefixed step takes the first property with
//! that local name. Positional predicates do not take part in matching.

use std::sync::Arc;

use thiserror::Error;
use tplv_core::{NamespaceTable, PropertyPath, SchemaError, SchemaProvider, SchemaType};

use crate::scope::ScopeContext;

/// The schema provider failed while a path was being resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Answers whether a path exists in a scope, and which type it yields.
///
/// Must be deterministic: the same `(path, scope type)` pair always gives
/// the same answer.
pub trait Resolver {
    /// `Ok(None)` when some step names no declared property.
    fn resolve(
        &self,
        path: &PropertyPath,
        scope: &ScopeContext<'_>,
    ) -> Result<Option<Arc<SchemaType>>, ResolveError>;
}

/// [`Resolver`] backed by a [`SchemaProvider`], comparing prefixes through
/// the namespace table of the run.
#[derive(Debug)]
pub struct SchemaResolver<'a, P: ?Sized> {
    provider: &'a P,
    namespaces: &'a NamespaceTable,
}

impl<'a, P: SchemaProvider + ?Sized> SchemaResolver<'a, P> {
    pub fn new(provider: &'a P, namespaces: &'a NamespaceTable) -> Self {
        Self { provider, namespaces }
    }
}

impl<P: SchemaProvider + ?Sized> Resolver for SchemaResolver<'_, P> {
    fn resolve(
        &self,
        path: &PropertyPath,
        scope: &ScopeContext<'_>,
    ) -> Result<Option<Arc<SchemaType>>, ResolveError> {
        let mut current: Option<Arc<SchemaType>> = None;
        for step in path.steps() {
            let ty = current.as_deref().unwrap_or_else(|| scope.schema_type());
            let Some(property) = ty.property(step, self.namespaces) else {
                tracing::trace!(path = %path, step = %step.local, prefix = ?step.prefix, schema_type = %ty.name(), "no such property");
                return Ok(None);
            };
            current = Some(self.provider.property_type(property)?);
        }
        Ok(current)
    }
}
