//! # Scope Context
//!
//! The schema type bound expressions are resolved against, chained to the
//! scope it was entered from. A child scope borrows its parent, so it cannot
//! outlive the recursion frame that created it.
//!
//! The parent link is only used for diagnostics ([`ScopeContext::lineage`]);
//! resolution always uses the innermost type.

use std::sync::Arc;

use tplv_core::SchemaType;

#[derive(Debug)]
pub struct ScopeContext<'p> {
    schema_type: Arc<SchemaType>,
    parent: Option<&'p ScopeContext<'p>>,
    depth: usize,
}

impl ScopeContext<'static> {
    /// The scope a validation run starts in.
    pub fn root(schema_type: Arc<SchemaType>) -> Self {
        Self {
            schema_type,
            parent: None,
            depth: 0,
        }
    }
}

impl<'p> ScopeContext<'p> {
    /// Enter `schema_type` from this scope.
    pub fn child(&self, schema_type: Arc<SchemaType>) -> ScopeContext<'_> {
        ScopeContext {
            schema_type,
            parent: Some(self),
            depth: self.depth + 1,
        }
    }

    pub fn schema_type(&self) -> &SchemaType {
        &self.schema_type
    }

    pub fn parent(&self) -> Option<&ScopeContext<'p>> {
        self.parent
    }

    /// Number of scope changes between this scope and the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Type names from this scope outward to the root.
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }

    /// Lineage rendered root-first, e.g. `st:Observation > st:ComplexType`.
    pub fn describe(&self) -> String {
        let mut names: Vec<&str> = self.lineage().collect();
        names.reverse();
        names.join(" > ")
    }
}

/// Iterator returned by [`ScopeContext::lineage`].
#[derive(Debug, Clone)]
pub struct Lineage<'a> {
    next: Option<&'a ScopeContext<'a>>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let scope = self.next?;
        self.next = scope.parent;
        Some(scope.schema_type.name())
    }
}
