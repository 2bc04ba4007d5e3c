//! # tplv-schema — Catalog and Template Loading
//!
//! Turns files into the inputs the checker consumes.
//!
//! ## Catalogs (`catalog`)
//!
//! A catalog document declares a namespace table and a list of complex
//! types with their properties:
//!
//! ```yaml
//! namespaces: { st: http://www.stations.org/1.0 }
//! types:
//!   - name: st:Observation
//!     properties:
//!       - { name: st:id, type: string }
//!       - { name: st:result, type: st:ComplexType }
//! ```
//!
//! ## Templates (`document`)
//!
//! Template documents are validated against `schemas/template.schema.json`
//! (embedded at compile time, or supplied from disk) before they are
//! deserialized into a [`TemplateNode`](tplv_core::TemplateNode). Every
//! structural violation is reported with its instance path, so authors see
//! all shape problems at once rather than the first serde error.
//!
//! ## Crate Policy
//!
//! - Depends only on `tplv-core` internally.
//! - Loading never checks bindings against the schema; that is `tplv-check`.

pub mod catalog;
pub mod document;
pub mod format;

pub use catalog::{load_catalog, parse_catalog, CatalogDocument};
pub use document::{DocumentError, TemplateLoader, Violation, Violations, TEMPLATE_SCHEMA};
pub use format::DocumentFormat;
