//! # Property Paths
//!
//! The canonical form every bound expression is reduced to before it is
//! checked against a schema: a `/`-separated list of steps, each an
//! optionally prefixed property name with an optional positional predicate.
//!
//! ```text
//! st:result/st:value
//! result[1]/value
//! ```

use std::fmt;

use crate::error::PathError;
use crate::schema::NamespaceTable;

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub prefix: Option<String>,
    pub local: String,
    /// Raw text between `[` and `]`, if any.
    pub predicate: Option<String>,
}

impl Step {
    fn parse(segment: &str, path: &str) -> Result<Self, PathError> {
        let segment = segment.trim();
        let (name, predicate) = match segment.split_once('[') {
            Some((name, rest)) => {
                let inner = rest
                    .strip_suffix(']')
                    .ok_or_else(|| PathError::UnterminatedPredicate(path.to_string()))?;
                (name, Some(inner.to_string()))
            }
            None => (segment, None),
        };
        let (prefix, local) = match name.split_once(':') {
            Some((p, l)) => (Some(p.to_string()), l),
            None => (None, name),
        };
        if local.is_empty() {
            return Err(PathError::EmptySegment(path.to_string()));
        }
        Ok(Self {
            prefix,
            local: local.to_string(),
            predicate,
        })
    }
}

/// A parsed property path, keeping the text it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    text: String,
    steps: Vec<Step>,
}

impl PropertyPath {
    /// Split a path without checking its prefixes.
    ///
    /// # Errors
    ///
    /// Returns `PathError::Empty` for blank input, `PathError::EmptySegment`
    /// for `a//b` or a bare prefix, and `PathError::UnterminatedPredicate`
    /// for `a[1`.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PathError::Empty);
        }
        let steps = text
            .split('/')
            .map(|segment| Step::parse(segment, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            text: text.to_string(),
            steps,
        })
    }

    /// Split a path and require every prefix to be declared in `namespaces`.
    ///
    /// # Errors
    ///
    /// Everything [`parse`](Self::parse) returns, plus
    /// `PathError::UnboundPrefix` for the first undeclared prefix.
    pub fn bind(text: &str, namespaces: &NamespaceTable) -> Result<Self, PathError> {
        let path = Self::parse(text)?;
        if let Some(prefix) = path
            .steps
            .iter()
            .filter_map(|s| s.prefix.as_deref())
            .find(|p| !namespaces.contains(p))
        {
            return Err(PathError::UnboundPrefix {
                path: path.text.clone(),
                prefix: prefix.to_string(),
            });
        }
        Ok(path)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Never empty: parsing rejects blank paths.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
