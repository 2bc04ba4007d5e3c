//! Validator configuration.

use serde::{Deserialize, Serialize};

/// How siblings that follow a `Source` node are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTraversal {
    /// Visit every child in document order and stop at the first failure.
    #[default]
    AllSiblings,
    /// The first `Source` child's result stands for the rest of its sibling
    /// list; later siblings are never visited.
    FirstSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub source_traversal: SourceTraversal,
}

impl ValidatorConfig {
    pub fn with_source_traversal(mut self, source_traversal: SourceTraversal) -> Self {
        self.source_traversal = source_traversal;
        self
    }
}
