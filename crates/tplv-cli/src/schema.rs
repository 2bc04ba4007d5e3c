//! # Schema Subcommand
//!
//! Lists what a catalog declares, so template authors can see which
//! property paths are available in each scope.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tplv_core::{SchemaCatalog, SchemaProvider, SchemaType};
use tplv_schema::load_catalog;

use crate::{EXIT_LOAD_FAILURE, EXIT_VALID};

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema catalog (YAML or JSON).
    #[arg(long)]
    pub catalog: PathBuf,

    /// Only show this type.
    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: Option<String>,
}

/// Execute the schema subcommand.
///
/// An unreadable catalog or an unknown `--type` exits with
/// [`EXIT_LOAD_FAILURE`].
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let catalog = match load_catalog(&args.catalog) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("{e}");
            return Ok(EXIT_LOAD_FAILURE);
        }
    };
    if let Some(name) = &args.type_name {
        if let Err(e) = catalog.schema_type(name) {
            tracing::error!("{e}");
            return Ok(EXIT_LOAD_FAILURE);
        }
    }
    print!("{}", describe(&catalog, args.type_name.as_deref())?);
    Ok(EXIT_VALID)
}

/// Render the catalog, or a single type of it.
pub fn describe(catalog: &SchemaCatalog, type_name: Option<&str>) -> Result<String> {
    let mut out = String::new();
    match type_name {
        Some(name) => {
            let schema_type = catalog.schema_type(name)?;
            describe_type(&mut out, catalog, &schema_type)?;
        }
        None => {
            if !catalog.namespace_table().is_empty() {
                writeln!(out, "Namespaces:")?;
                for (prefix, uri) in catalog.namespace_table().iter() {
                    writeln!(out, "  {prefix:<8} {uri}")?;
                }
                writeln!(out)?;
            }
            for schema_type in catalog.types() {
                describe_type(&mut out, catalog, schema_type)?;
            }
            writeln!(out, "Total: {} types", catalog.len())?;
        }
    }
    Ok(out)
}

fn describe_type(out: &mut String, catalog: &SchemaCatalog, schema_type: &SchemaType) -> Result<()> {
    writeln!(out, "{}", schema_type.name())?;
    for property in schema_type.properties() {
        let kind = if catalog.property_type(property)?.is_simple() {
            "simple"
        } else {
            "complex"
        };
        writeln!(out, "  {:<24} {} ({kind})", property.name, property.type_name)?;
    }
    writeln!(out)?;
    Ok(())
}
