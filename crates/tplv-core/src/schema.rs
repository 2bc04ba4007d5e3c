//! # Schema Model
//!
//! Feature types and nested complex types, their declared properties, and
//! the namespace-prefix table used to bind prefixed property paths.
//!
//! Property types are named by string. A name that matches a registered
//! complex type resolves to that type; any other name is a simple binding
//! (`string`, `int`, `geometry`, ...) and resolves to a leaf type with no
//! properties of its own.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::path::Step;

/// Returns the part of a qualified name after the first `:`.
pub fn local_part(name: &str) -> &str {
    name.split_once(':').map_or(name, |(_, local)| local)
}

/// Returns the prefix of a qualified name, if it has one.
pub fn prefix_part(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}

/// A declared property of a schema type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name, optionally prefixed (`st:result`).
    pub name: String,
    /// Name of the property's type: a complex type or a simple binding.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// The property name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    pub fn prefix(&self) -> Option<&str> {
        prefix_part(&self.name)
    }

    /// Whether `step` names this property.
    ///
    /// Local names must be equal. A step without a prefix matches any
    /// namespace, as does an unprefixed declaration. Otherwise the prefixes
    /// must be equal or bound to the same URI in `namespaces`.
    pub fn matches(&self, step: &Step, namespaces: &NamespaceTable) -> bool {
        if self.local_name() != step.local {
            return false;
        }
        match (step.prefix.as_deref(), self.prefix()) {
            (None, _) | (_, None) => true,
            (Some(wanted), Some(declared)) => {
                wanted == declared
                    || matches!(
                        (namespaces.uri(wanted), namespaces.uri(declared)),
                        (Some(a), Some(b)) if a == b
                    )
            }
        }
    }
}

/// A feature type, a nested complex type, or a simple leaf binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaType {
    name: String,
    #[serde(default)]
    properties: Vec<PropertyDescriptor>,
}

impl SchemaType {
    /// Create a type with the given properties.
    pub fn new(name: impl Into<String>, properties: Vec<PropertyDescriptor>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Create a leaf type for a simple binding.
    pub fn simple(binding: impl Into<String>) -> Self {
        Self::new(binding, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    pub fn prefix(&self) -> Option<&str> {
        prefix_part(&self.name)
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// True for leaf types, which have no properties to resolve against.
    pub fn is_simple(&self) -> bool {
        self.properties.is_empty()
    }

    /// The first declared property that `step` names, in declaration order.
    pub fn property(&self, step: &Step, namespaces: &NamespaceTable) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.matches(step, namespaces))
    }
}

/// Map from namespace prefix to namespace URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceTable(BTreeMap<String, String>);

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a prefix.
    pub fn declare(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.0.insert(prefix.into(), uri.into());
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.0.contains_key(prefix)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(prefix, uri)` pairs in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl<P: Into<String>, U: Into<String>> FromIterator<(P, U)> for NamespaceTable {
    fn from_iter<I: IntoIterator<Item = (P, U)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(p, u)| (p.into(), u.into())).collect())
    }
}

/// Source of schema information for the checker.
///
/// Implementations must be deterministic: the same question always gets
/// the same answer for the lifetime of a validation run.
pub trait SchemaProvider {
    /// Look up a type by name.
    fn schema_type(&self, name: &str) -> Result<Arc<SchemaType>, SchemaError>;

    /// The namespace-prefix table in effect for `schema_type`.
    fn namespaces(&self, schema_type: &SchemaType) -> Result<NamespaceTable, SchemaError>;

    /// Materialize the type of a declared property.
    fn property_type(&self, property: &PropertyDescriptor) -> Result<Arc<SchemaType>, SchemaError>;
}

/// In-memory [`SchemaProvider`] holding a fixed set of complex types and
/// one namespace table shared by all of them.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    namespaces: NamespaceTable,
    types: BTreeMap<String, Arc<SchemaType>>,
}

impl SchemaCatalog {
    pub fn new(namespaces: NamespaceTable) -> Self {
        Self {
            namespaces,
            types: BTreeMap::new(),
        }
    }

    /// Register a complex type.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateType` if the name is already taken and
    /// `SchemaError::DuplicateProperty` if the type repeats a qualified
    /// property name. Two prefixes bound to the same URI count as one.
    pub fn register(&mut self, schema_type: SchemaType) -> Result<(), SchemaError> {
        if self.types.contains_key(schema_type.name()) {
            return Err(SchemaError::DuplicateType(schema_type.name().to_string()));
        }
        let props = schema_type.properties();
        for (i, p) in props.iter().enumerate() {
            if props[..i].iter().any(|q| self.qualified(q) == self.qualified(p)) {
                return Err(SchemaError::DuplicateProperty {
                    type_name: schema_type.name().to_string(),
                    property: p.name.clone(),
                });
            }
        }
        self.types
            .insert(schema_type.name().to_string(), Arc::new(schema_type));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_type(mut self, schema_type: SchemaType) -> Result<Self, SchemaError> {
        self.register(schema_type)?;
        Ok(self)
    }

    pub fn namespace_table(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Registered complex types in name order.
    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.values().map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Namespace (URI when bound, else the raw prefix) and local name.
    fn qualified<'p>(&'p self, property: &'p PropertyDescriptor) -> (Option<&'p str>, &'p str) {
        let namespace = property
            .prefix()
            .map(|prefix| self.namespaces.uri(prefix).unwrap_or(prefix));
        (namespace, property.local_name())
    }

    /// Exact name first, then a unique match on the local name.
    fn find(&self, name: &str) -> Option<&Arc<SchemaType>> {
        if let Some(t) = self.types.get(name) {
            return Some(t);
        }
        let local = local_part(name);
        let mut matches = self.types.values().filter(|t| t.local_name() == local);
        match (matches.next(), matches.next()) {
            (Some(t), None) => Some(t),
            _ => None,
        }
    }
}

impl SchemaProvider for SchemaCatalog {
    fn schema_type(&self, name: &str) -> Result<Arc<SchemaType>, SchemaError> {
        self.find(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    fn namespaces(&self, schema_type: &SchemaType) -> Result<NamespaceTable, SchemaError> {
        if let Some(prefix) = schema_type.prefix() {
            if !self.namespaces.contains(prefix) {
                return Err(SchemaError::UndeclaredNamespace {
                    type_name: schema_type.name().to_string(),
                    prefix: prefix.to_string(),
                });
            }
        }
        Ok(self.namespaces.clone())
    }

    fn property_type(&self, property: &PropertyDescriptor) -> Result<Arc<SchemaType>, SchemaError> {
        Ok(self
            .find(&property.type_name)
            .cloned()
            .unwrap_or_else(|| Arc::new(SchemaType::simple(property.type_name.clone()))))
    }
}
