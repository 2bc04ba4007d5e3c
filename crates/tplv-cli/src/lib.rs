//! # tplv-cli — Command-Line Interface
//!
//! Provides the `tplv` binary.
//!
//! ## Subcommands
//!
//! - `tplv check` — load a catalog and a template and check every binding.
//! - `tplv schema` — list the types and properties a catalog declares.
//!
//! ```bash
//! tplv check --catalog fixtures/observation.catalog.yaml \
//!     --template fixtures/templates/observation.valid.yaml --type st:Observation
//! tplv -v check ... --traversal first-source --format json
//! tplv schema --catalog fixtures/observation.catalog.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - `0` — the template is valid (or the command succeeded).
//! - `1` — the template is invalid, or the run hit an unrecoverable error.
//! - `2` — an input could not be loaded.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the checking itself, which lives in
//!   `tplv-check`.

pub mod check;
pub mod config;
pub mod schema;

/// Exit code for a valid template.
pub const EXIT_VALID: u8 = 0;
/// Exit code for an invalid template or an unrecoverable error.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for an input that could not be loaded.
pub const EXIT_LOAD_FAILURE: u8 = 2;
