//! # Template Validator
//!
//! Depth-first, fail-fast walk over a template tree.
//!
//! For every child, in document order:
//!
//! - a `DynamicValue` with a CQL expression must canonicalize to a path that
//!   resolves in the current scope. One with an XPath reference must
//!   resolve directly. One with neither is accepted as is.
//! - a `Source` with a path opens a child scope over the type the path
//!   resolves to, unless the path's non-empty local name already occurs in
//!   the current type's name, in which case the scope is kept. A `Source` without a path
//!   keeps the scope, unless it iterates, which is a failure.
//!
//! The first failure ends the run. Malformed expressions and schema errors
//! met along the way become `Exception` diagnostics rather than errors.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tplv_core::schema::local_part;
use tplv_core::{
    DynamicValueNode, Expression, NamespaceTable, PropertyPath, SchemaError, SchemaProvider,
    SchemaType, SourceNode, TemplateNode,
};

use crate::config::{SourceTraversal, ValidatorConfig};
use crate::extract::PathExtractor;
use crate::resolve::{Resolver, SchemaResolver};
use crate::scope::ScopeContext;

/// Why a template was rejected.
///
/// `Display` gives the failing-attribute text reported to template authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A dynamic value's binding does not resolve.
    UnresolvedValue { key: String, value: String },
    /// A source path does not resolve.
    UnresolvedSource { path: String },
    /// An iterating source declares no path.
    MissingIteratingPath,
    /// An expression or schema lookup failed while being checked.
    Exception { message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedValue { key, value } => write!(f, "Key: {key} Value: {value}"),
            Diagnostic::UnresolvedSource { path } => write!(f, "Source: {path}"),
            Diagnostic::MissingIteratingPath => f.write_str("Source: iterating source declares no path"),
            Diagnostic::Exception { message } => write!(f, "Exception: {message}"),
        }
    }
}

/// Result of a completed validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every binding resolved in its scope.
    Valid,
    /// The walk stopped at the first binding that did not.
    Invalid(Diagnostic),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(d) => Some(d),
        }
    }

    /// The diagnostic text of the failure, `None` for a valid template.
    pub fn failing_attribute(&self) -> Option<String> {
        self.diagnostic().map(Diagnostic::to_string)
    }
}

/// A run that could not be carried out at all.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The namespace table of the root type is unavailable; no path can be
    /// bound without it.
    #[error("unable to retrieve namespaces for schema type '{type_name}': {source}")]
    NamespaceLookup {
        type_name: String,
        #[source]
        source: SchemaError,
    },
}

/// Checks templates against one root schema type.
///
/// Holds no per-run state: the same validator can check any number of
/// templates, from any number of threads when `P: Sync`.
#[derive(Debug)]
pub struct TemplateValidator<'a, P: ?Sized> {
    provider: &'a P,
    root_type: Arc<SchemaType>,
    config: ValidatorConfig,
}

impl<'a, P: SchemaProvider + ?Sized> TemplateValidator<'a, P> {
    pub fn new(provider: &'a P, root_type: Arc<SchemaType>) -> Self {
        Self {
            provider,
            root_type,
            config: ValidatorConfig::default(),
        }
    }

    /// Validator for the provider's type named `type_name`.
    ///
    /// # Errors
    ///
    /// Whatever the provider returns for an unknown type.
    pub fn for_type(provider: &'a P, type_name: &str) -> Result<Self, SchemaError> {
        let root_type = provider.schema_type(type_name)?;
        Ok(Self::new(provider, root_type))
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root_type(&self) -> &SchemaType {
        &self.root_type
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Check every binding under `root`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NamespaceLookup` if the root type's
    /// namespace table cannot be obtained. Every other problem is reported
    /// as `Ok(ValidationOutcome::Invalid(_))`.
    pub fn validate_template(&self, root: &TemplateNode) -> Result<ValidationOutcome, ValidationError> {
        let namespaces = self.namespaces()?;
        let walk = Walk {
            extractor: PathExtractor::new(&namespaces),
            resolver: SchemaResolver::new(self.provider, &namespaces),
            traversal: self.config.source_traversal,
        };
        let scope = ScopeContext::root(Arc::clone(&self.root_type));

        tracing::debug!(
            schema_type = %self.root_type.name(),
            nodes = root.node_count(),
            traversal = ?self.config.source_traversal,
            "validating template"
        );

        match walk.children(root.children(), &scope) {
            Ok(()) => Ok(ValidationOutcome::Valid),
            Err(diagnostic) => Ok(ValidationOutcome::Invalid(diagnostic)),
        }
    }

    fn namespaces(&self) -> Result<NamespaceTable, ValidationError> {
        self.provider
            .namespaces(&self.root_type)
            .map_err(|source| ValidationError::NamespaceLookup {
                type_name: self.root_type.name().to_string(),
                source,
            })
    }
}

/// One validation run.
struct Walk<'n, R> {
    extractor: PathExtractor<'n>,
    resolver: R,
    traversal: SourceTraversal,
}

impl<R: Resolver> Walk<'_, R> {
    fn children(&self, children: &[TemplateNode], scope: &ScopeContext<'_>) -> Result<(), Diagnostic> {
        for child in children {
            match child {
                TemplateNode::DynamicValue(node) => self.dynamic_value(node, scope)?,
                TemplateNode::Source(node) => {
                    let result = self.source(node, scope);
                    if self.traversal == SourceTraversal::FirstSource {
                        return result;
                    }
                    result?;
                }
                // A nested root groups its children without changing scope.
                TemplateNode::Root(node) => self.children(&node.children, scope)?,
            }
        }
        Ok(())
    }

    fn dynamic_value(&self, node: &DynamicValueNode, scope: &ScopeContext<'_>) -> Result<(), Diagnostic> {
        if let Some(cql) = &node.cql {
            let path = self
                .extractor
                .canonicalize(cql)
                .map_err(|e| self.exception(scope, e))?;
            let resolved = match path {
                Some(path) => self.resolve(&path, scope)?,
                None => None,
            };
            if resolved.is_none() {
                return Err(self.fail(
                    scope,
                    Diagnostic::UnresolvedValue {
                        key: node.key.clone(),
                        value: cql.to_string(),
                    },
                ));
            }
        } else if let Some(xpath) = &node.xpath {
            let Expression::Attribute(property) = xpath else {
                let message = format!("xpath binding of '{}' is not a property reference: {xpath}", node.key);
                return Err(self.fail(scope, Diagnostic::Exception { message }));
            };
            let path = PropertyPath::parse(property).map_err(|e| self.exception(scope, e))?;
            if self.resolve(&path, scope)?.is_none() {
                return Err(self.fail(
                    scope,
                    Diagnostic::UnresolvedValue {
                        key: node.key.clone(),
                        value: property.clone(),
                    },
                ));
            }
        }
        Ok(())
    }

    fn source(&self, node: &SourceNode, scope: &ScopeContext<'_>) -> Result<(), Diagnostic> {
        let Some(path) = &node.path else {
            if node.iterating {
                return Err(self.fail(scope, Diagnostic::MissingIteratingPath));
            }
            return self.children(&node.children, scope);
        };

        let text = path.to_string();
        let local = local_part(&text);
        if !local.is_empty() && scope.schema_type().name().contains(local) {
            tracing::debug!(source = %text, schema_type = %scope.schema_type().name(), "source stays in current type");
            return self.children(&node.children, scope);
        }

        let canonical = self
            .extractor
            .canonicalize(path)
            .map_err(|e| self.exception(scope, e))?;
        let resolved = match canonical {
            Some(canonical) => self.resolve(&canonical, scope)?,
            None => None,
        };
        let Some(schema_type) = resolved else {
            return Err(self.fail(scope, Diagnostic::UnresolvedSource { path: text }));
        };

        let inner = scope.child(schema_type);
        tracing::debug!(source = %text, scope = %inner.describe(), iterating = node.iterating, "entering scope");
        self.children(&node.children, &inner)
    }

    fn resolve(&self, path: &PropertyPath, scope: &ScopeContext<'_>) -> Result<Option<Arc<SchemaType>>, Diagnostic> {
        self.resolver
            .resolve(path, scope)
            .map_err(|e| self.exception(scope, e))
    }

    fn exception(&self, scope: &ScopeContext<'_>, error: impl fmt::Display) -> Diagnostic {
        self.fail(
            scope,
            Diagnostic::Exception {
                message: error.to_string(),
            },
        )
    }

    fn fail(&self, scope: &ScopeContext<'_>, diagnostic: Diagnostic) -> Diagnostic {
        tracing::warn!(scope = %scope.describe(), "{diagnostic}");
        diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tplv_core::{PropertyDescriptor, SchemaCatalog};

    fn catalog() -> SchemaCatalog {
        let ns: NamespaceTable = [("st", "http://www.stations.org/1.0")].into_iter().collect();
        SchemaCatalog::new(ns)
            .with_type(SchemaType::new(
                "st:Observation",
                vec![
                    PropertyDescriptor::new("st:id", "string"),
                    PropertyDescriptor::new("st:result", "st:ComplexType"),
                    PropertyDescriptor::new("st:station", "st:Station"),
                ],
            ))
            .unwrap()
            .with_type(SchemaType::new(
                "st:ComplexType",
                vec![PropertyDescriptor::new("st:value", "string")],
            ))
            .unwrap()
            .with_type(SchemaType::new(
                "st:Station",
                vec![PropertyDescriptor::new("st:name", "string")],
            ))
            .unwrap()
    }

    fn check(root: &TemplateNode) -> ValidationOutcome {
        let catalog = catalog();
        TemplateValidator::for_type(&catalog, "st:Observation")
            .unwrap()
            .validate_template(root)
            .unwrap()
    }

    fn check_with(root: &TemplateNode, traversal: SourceTraversal) -> ValidationOutcome {
        let catalog = catalog();
        TemplateValidator::for_type(&catalog, "st:Observation")
            .unwrap()
            .with_config(ValidatorConfig::default().with_source_traversal(traversal))
            .validate_template(root)
            .unwrap()
    }

    #[test]
    fn diagnostic_display_formats() {
        let v = Diagnostic::UnresolvedValue {
            key: "bad".to_string(),
            value: "doesNotExist".to_string(),
        };
        assert_eq!(v.to_string(), "Key: bad Value: doesNotExist");
        assert_eq!(
            Diagnostic::UnresolvedSource { path: "st:nope".to_string() }.to_string(),
            "Source: st:nope"
        );
        assert_eq!(
            Diagnostic::Exception { message: "boom".to_string() }.to_string(),
            "Exception: boom"
        );
        assert!(Diagnostic::MissingIteratingPath.to_string().starts_with("Source: "));
    }

    #[test]
    fn valid_outcome_has_no_failing_attribute() {
        assert_eq!(ValidationOutcome::Valid.failing_attribute(), None);
        assert!(ValidationOutcome::Valid.is_valid());
    }

    #[test]
    fn empty_template_is_valid() {
        assert!(check(&TemplateNode::root(vec![])).is_valid());
    }

    #[test]
    fn dynamic_value_without_binding_is_valid() {
        let root = TemplateNode::root(vec![TemplateNode::DynamicValue(DynamicValueNode {
            key: "static".to_string(),
            cql: None,
            xpath: None,
        })]);
        assert!(check(&root).is_valid());
    }

    #[test]
    fn literal_cql_binding_is_unresolved() {
        let root = TemplateNode::root(vec![TemplateNode::cql("k", Expression::literal("text"))]);
        assert_eq!(
            check(&root).failing_attribute().as_deref(),
            Some("Key: k Value: text")
        );
    }

    #[test]
    fn xpath_binding_reports_property_name() {
        let root = TemplateNode::root(vec![TemplateNode::xpath("name", "st:name")]);
        assert_eq!(
            check(&root).failing_attribute().as_deref(),
            Some("Key: name Value: st:name")
        );
    }

    #[test]
    fn xpath_binding_must_be_a_property_reference() {
        let root = TemplateNode::root(vec![TemplateNode::DynamicValue(DynamicValueNode {
            key: "k".to_string(),
            cql: None,
            xpath: Some(Expression::literal("id")),
        })]);
        let attr = check(&root).failing_attribute().unwrap();
        assert!(attr.starts_with("Exception: "), "{attr}");
    }

    #[test]
    fn cql_takes_precedence_over_xpath() {
        let root = TemplateNode::root(vec![TemplateNode::DynamicValue(DynamicValueNode {
            key: "k".to_string(),
            cql: Some(Expression::attribute("id")),
            xpath: Some(Expression::attribute("nope")),
        })]);
        assert!(check(&root).is_valid());
    }

    #[test]
    fn unbound_prefix_becomes_exception_diagnostic() {
        let root = TemplateNode::root(vec![TemplateNode::cql("k", Expression::xpath("gml:id"))]);
        let attr = check(&root).failing_attribute().unwrap();
        assert!(attr.starts_with("Exception: "), "{attr}");
        assert!(attr.contains("gml"), "{attr}");
    }

    fn check_gml(root: &TemplateNode) -> ValidationOutcome {
        let ns: NamespaceTable = [
            ("st", "http://www.stations.org/1.0"),
            ("gml", "http://www.opengis.net/gml/3.2"),
        ]
        .into_iter()
        .collect();
        let catalog = SchemaCatalog::new(ns)
            .with_type(SchemaType::new(
                "st:Observation",
                vec![
                    PropertyDescriptor::new("st:id", "string"),
                    PropertyDescriptor::new("gml:name", "string"),
                    PropertyDescriptor::new("st:name", "string"),
                ],
            ))
            .unwrap();
        TemplateValidator::for_type(&catalog, "st:Observation")
            .unwrap()
            .validate_template(root)
            .unwrap()
    }

    #[test]
    fn prefixed_binding_in_another_namespace_is_unresolved() {
        let cql = TemplateNode::root(vec![TemplateNode::cql("id", Expression::attribute("gml:id"))]);
        assert_eq!(
            check_gml(&cql).failing_attribute().as_deref(),
            Some("Key: id Value: gml:id")
        );

        let wrapped = TemplateNode::root(vec![TemplateNode::cql("id", Expression::xpath("gml:id"))]);
        assert_eq!(
            check_gml(&wrapped).failing_attribute().as_deref(),
            Some("Key: id Value: xpath('gml:id')")
        );
    }

    #[test]
    fn same_local_name_in_two_namespaces_resolves_by_prefix() {
        let root = TemplateNode::root(vec![
            TemplateNode::cql("a", Expression::attribute("gml:name")),
            TemplateNode::cql("b", Expression::xpath("st:name")),
            TemplateNode::xpath("c", "st:id"),
        ]);
        assert!(check_gml(&root).is_valid());
    }

    #[test]
    fn empty_local_name_does_not_keep_scope() {
        let bare_prefix = TemplateNode::root(vec![TemplateNode::iterating(
            Expression::attribute("st:"),
            vec![],
        )]);
        let attr = check(&bare_prefix).failing_attribute().unwrap();
        assert!(attr.starts_with("Exception: "), "{attr}");

        let blank = TemplateNode::root(vec![TemplateNode::source(Expression::literal(""), vec![])]);
        assert_eq!(check(&blank).failing_attribute().as_deref(), Some("Source: "));
    }

    #[test]
    fn source_with_own_type_name_keeps_scope() {
        let root = TemplateNode::root(vec![TemplateNode::source(
            Expression::attribute("st:Observation"),
            vec![TemplateNode::cql("id", Expression::attribute("id"))],
        )]);
        assert!(check(&root).is_valid());
    }

    #[test]
    fn pathless_source_inherits_scope() {
        let root = TemplateNode::root(vec![TemplateNode::group(vec![TemplateNode::cql(
            "id",
            Expression::attribute("st:id"),
        )])]);
        assert!(check(&root).is_valid());
    }

    #[test]
    fn pathless_iterating_source_fails() {
        let root = TemplateNode::root(vec![TemplateNode::Source(SourceNode {
            path: None,
            iterating: true,
            children: vec![],
        })]);
        assert_eq!(
            check(&root),
            ValidationOutcome::Invalid(Diagnostic::MissingIteratingPath)
        );
    }

    #[test]
    fn literal_source_path_is_unresolved() {
        let root = TemplateNode::root(vec![TemplateNode::source(Expression::literal("x"), vec![])]);
        assert_eq!(check(&root).failing_attribute().as_deref(), Some("Source: x"));
    }

    #[test]
    fn nested_scopes_chain() {
        let root = TemplateNode::root(vec![TemplateNode::source(
            Expression::attribute("st:result"),
            vec![
                TemplateNode::cql("v", Expression::attribute("st:value")),
                TemplateNode::source(Expression::attribute("st:value"), vec![]),
            ],
        )]);
        assert!(check(&root).is_valid());
    }

    #[test]
    fn sibling_after_source_checked_by_default() {
        let root = TemplateNode::root(vec![
            TemplateNode::source(
                Expression::attribute("st:result"),
                vec![TemplateNode::cql("v", Expression::attribute("value"))],
            ),
            TemplateNode::cql("late", Expression::attribute("missing")),
        ]);
        assert_eq!(
            check_with(&root, SourceTraversal::AllSiblings).failing_attribute().as_deref(),
            Some("Key: late Value: missing")
        );
        assert!(check_with(&root, SourceTraversal::FirstSource).is_valid());
    }

    #[test]
    fn first_source_policy_returns_source_failure() {
        let root = TemplateNode::root(vec![
            TemplateNode::source(Expression::attribute("nope"), vec![]),
            TemplateNode::cql("late", Expression::attribute("missing")),
        ]);
        assert_eq!(
            check_with(&root, SourceTraversal::FirstSource).failing_attribute().as_deref(),
            Some("Source: nope")
        );
    }

    #[test]
    fn nested_root_groups_children() {
        let root = TemplateNode::root(vec![TemplateNode::root(vec![TemplateNode::cql(
            "bad",
            Expression::attribute("missing"),
        )])]);
        assert_eq!(
            check(&root).failing_attribute().as_deref(),
            Some("Key: bad Value: missing")
        );
    }

    #[test]
    fn namespace_lookup_failure_is_fatal() {
        let catalog = SchemaCatalog::new(NamespaceTable::new())
            .with_type(SchemaType::new(
                "gml:Feature",
                vec![PropertyDescriptor::new("id", "string")],
            ))
            .unwrap();
        let err = TemplateValidator::for_type(&catalog, "gml:Feature")
            .unwrap()
            .validate_template(&TemplateNode::root(vec![]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NamespaceLookup { ref type_name, .. } if type_name == "gml:Feature"));
        assert!(err.to_string().contains("gml:Feature"));
    }

    #[test]
    fn validator_is_reusable() {
        let catalog = catalog();
        let validator = TemplateValidator::for_type(&catalog, "st:Observation").unwrap();
        let bad = TemplateNode::root(vec![TemplateNode::cql("bad", Expression::attribute("x"))]);
        let good = TemplateNode::root(vec![TemplateNode::cql("id", Expression::attribute("id"))]);
        assert!(!validator.validate_template(&bad).unwrap().is_valid());
        assert!(validator.validate_template(&good).unwrap().is_valid());
    }
}
