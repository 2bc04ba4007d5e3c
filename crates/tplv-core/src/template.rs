//! # Template Tree
//!
//! The node hierarchy of a linked-data template as handed over by the
//! template loader. The checker only reads it.
//!
//! - `Root` — top of the document.
//! - `Source` — opens a scope over the type its path resolves to, or keeps
//!   the current scope when it has no path. Iterating sources walk repeated
//!   occurrences and must declare a path.
//! - `DynamicValue` — binds one output key to a CQL- or XPath-style
//!   expression.

use serde::{Deserialize, Serialize};

use crate::expr::Expression;

/// Top of a template document, or a grouping node nested inside one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootNode {
    /// Checked in the scope of the enclosing node.
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

/// A scope-changing node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    /// Property the children are read from. `None` keeps the enclosing
    /// scope.
    #[serde(default)]
    pub path: Option<Expression>,
    /// Whether the node repeats once per occurrence of `path`.
    #[serde(default)]
    pub iterating: bool,
    /// Checked in the scope `path` opens.
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

/// One output key and the expression that produces its value.
///
/// When both bindings are present only `cql` is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicValueNode {
    /// Output key, as written in the template.
    pub key: String,
    /// CQL-style expression: any [`Expression`] shape.
    #[serde(default)]
    pub cql: Option<Expression>,
    /// XPath-style binding, expected to be a plain property reference.
    #[serde(default)]
    pub xpath: Option<Expression>,
}

/// A node of the template tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateNode {
    Root(RootNode),
    Source(SourceNode),
    DynamicValue(DynamicValueNode),
}

impl TemplateNode {
    pub fn root(children: Vec<TemplateNode>) -> Self {
        TemplateNode::Root(RootNode { children })
    }

    /// Non-iterating source over `path`.
    pub fn source(path: Expression, children: Vec<TemplateNode>) -> Self {
        TemplateNode::Source(SourceNode {
            path: Some(path),
            iterating: false,
            children,
        })
    }

    /// Iterating source over `path`.
    pub fn iterating(path: Expression, children: Vec<TemplateNode>) -> Self {
        TemplateNode::Source(SourceNode {
            path: Some(path),
            iterating: true,
            children,
        })
    }

    /// Non-iterating source without a path; its children share the
    /// enclosing scope.
    pub fn group(children: Vec<TemplateNode>) -> Self {
        TemplateNode::Source(SourceNode {
            path: None,
            iterating: false,
            children,
        })
    }

    /// Dynamic value bound by a CQL-style expression.
    pub fn cql(key: impl Into<String>, expression: Expression) -> Self {
        TemplateNode::DynamicValue(DynamicValueNode {
            key: key.into(),
            cql: Some(expression),
            xpath: None,
        })
    }

    /// Dynamic value bound by an XPath-style property reference.
    pub fn xpath(key: impl Into<String>, property: impl Into<String>) -> Self {
        TemplateNode::DynamicValue(DynamicValueNode {
            key: key.into(),
            cql: None,
            xpath: Some(Expression::attribute(property)),
        })
    }

    pub fn children(&self) -> &[TemplateNode] {
        match self {
            TemplateNode::Root(n) => &n.children,
            TemplateNode::Source(n) => &n.children,
            TemplateNode::DynamicValue(_) => &[],
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(TemplateNode::node_count).sum::<usize>()
    }
}
