//! # tplv-check — Static Template Checking
//!
//! Walks a template tree depth-first and verifies that every bound
//! expression resolves to a declared property of the schema type in effect
//! at that point of the tree. Stops at the first failure.
//!
//! ## Components
//!
//! - [`validator`] — the orchestrator. Owns traversal, scope changes and
//!   the fail-fast control flow. Entry point:
//!   [`TemplateValidator::validate_template`].
//! - [`extract`] — reduces an expression to one canonical
//!   [`PropertyPath`](tplv_core::PropertyPath), or decides there is none.
//! - [`resolve`] — answers whether a path exists on a scope's type and what
//!   type it yields.
//! - [`scope`] — the chain of schema types entered on the way down.
//!
//! ## Outcomes
//!
//! An invalid template is not an error: `validate_template` returns
//! `Ok(ValidationOutcome::Invalid(diagnostic))`. `Err` is reserved for the
//! one condition the checker cannot reason past, a failed namespace lookup
//! for the root type.

pub mod config;
pub mod extract;
pub mod resolve;
pub mod scope;
pub mod validator;

pub use config::{SourceTraversal, ValidatorConfig};
pub use extract::{ExtractError, PathExtractor};
pub use resolve::{ResolveError, Resolver, SchemaResolver};
pub use scope::ScopeContext;
pub use validator::{Diagnostic, TemplateValidator, ValidationError, ValidationOutcome};
