//! # tplv-core — Foundational Types for Template Validation
//!
//! This crate defines the data model shared by every other crate in the
//! workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed variants.** `TemplateNode` and `Expression` are enums with a
//!    fixed set of shapes. Adding a node kind or expression shape forces every
//!    consumer to handle it through exhaustive `match`.
//!
//! 2. **Schema access behind a trait.** The checker only sees schema types
//!    through [`SchemaProvider`]. [`SchemaCatalog`] is the in-memory provider
//!    used by the loader and by tests.
//!
//! 3. **Parsed input only.** Expressions arrive as trees. The only text this
//!    crate ever splits is a property path (`ns:a/ns:b[1]`).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tplv-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod expr;
pub mod path;
pub mod schema;
pub mod template;

// Re-export primary types for ergonomic imports.
pub use error::{PathError, SchemaError};
pub use expr::{Expression, Literal};
pub use path::{PropertyPath, Step};
pub use schema::{NamespaceTable, PropertyDescriptor, SchemaCatalog, SchemaProvider, SchemaType};
pub use template::{DynamicValueNode, RootNode, SourceNode, TemplateNode};
