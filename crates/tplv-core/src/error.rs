//! # Error Types
//!
//! Errors raised while building or querying the schema model and while
//! splitting property paths. All errors use `thiserror`.

use thiserror::Error;

/// Failure to obtain schema information from a provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No type with this name is registered.
    #[error("unknown schema type '{0}'")]
    UnknownType(String),

    /// A type name uses a prefix that has no namespace declaration.
    #[error("namespace prefix '{prefix}' of type '{type_name}' is not declared")]
    UndeclaredNamespace {
        /// Type whose namespaces were requested.
        type_name: String,
        /// The prefix that could not be mapped to a URI.
        prefix: String,
    },

    /// The same type name was registered twice.
    #[error("schema type '{0}' is declared more than once")]
    DuplicateType(String),

    /// A type declares the same qualified property name twice.
    #[error("property '{property}' is declared more than once on type '{type_name}'")]
    DuplicateProperty {
        /// Type declaring the property.
        type_name: String,
        /// Repeated property name.
        property: String,
    },
}

/// Failure to split or bind a property path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path text was empty or only whitespace.
    #[error("property path is empty")]
    Empty,

    /// A `/`-separated segment was empty, e.g. `a//b`.
    #[error("property path '{0}' contains an empty segment")]
    EmptySegment(String),

    /// A positional predicate was not closed, e.g. `a[1`.
    #[error("property path '{0}' has an unterminated predicate")]
    UnterminatedPredicate(String),

    /// A prefixed segment uses a prefix missing from the namespace table.
    #[error("unbound namespace prefix '{prefix}' in property path '{path}'")]
    UnboundPrefix {
        /// Full path text.
        path: String,
        /// The prefix with no declaration.
        prefix: String,
    },
}
