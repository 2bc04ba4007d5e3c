//! # Check Subcommand
//!
//! Loads a schema catalog and a template document and reports whether every
//! binding of the template resolves against the chosen root type.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tplv_check::{SourceTraversal, TemplateValidator, ValidationOutcome, ValidatorConfig};
use tplv_core::{SchemaCatalog, TemplateNode};
use tplv_schema::{load_catalog, DocumentError, TemplateLoader};

use crate::config::CliConfig;
use crate::{EXIT_INVALID, EXIT_LOAD_FAILURE, EXIT_VALID};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema catalog (YAML or JSON).
    #[arg(long)]
    pub catalog: PathBuf,

    /// Template document (YAML or JSON).
    #[arg(long)]
    pub template: PathBuf,

    /// Root schema type the template is written for, e.g. st:Observation.
    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: String,

    /// How siblings after a source node are visited. Overrides the config file.
    #[arg(long, value_enum)]
    pub traversal: Option<TraversalArg>,

    /// Template schema to validate the document shape with. Overrides the
    /// config file.
    #[arg(long)]
    pub template_schema: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraversalArg {
    AllSiblings,
    FirstSource,
}

impl From<TraversalArg> for SourceTraversal {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::AllSiblings => SourceTraversal::AllSiblings,
            TraversalArg::FirstSource => SourceTraversal::FirstSource,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: &CliConfig) -> Result<u8> {
    let (catalog, template) = match load_inputs(args, config) {
        Ok(inputs) => inputs,
        Err(e) => {
            tracing::error!("{e}");
            return Ok(EXIT_LOAD_FAILURE);
        }
    };

    let validator = match TemplateValidator::for_type(&catalog, &args.type_name) {
        Ok(v) => v.with_config(validator_config(args, config)),
        Err(e) => {
            tracing::error!("{e}");
            return Ok(EXIT_LOAD_FAILURE);
        }
    };

    let outcome = validator
        .validate_template(&template)
        .with_context(|| format!("cannot check template {}", args.template.display()))?;

    println!("{}", render(args, &outcome));
    Ok(if outcome.is_valid() {
        EXIT_VALID
    } else {
        EXIT_INVALID
    })
}

fn load_inputs(args: &CheckArgs, config: &CliConfig) -> Result<(SchemaCatalog, TemplateNode), DocumentError> {
    let catalog = load_catalog(&args.catalog)?;
    let loader = match args.template_schema.as_ref().or(config.template_schema.as_ref()) {
        Some(path) => TemplateLoader::from_schema_file(path)?,
        None => TemplateLoader::new()?,
    };
    let template = loader.load_file(&args.template)?;
    Ok((catalog, template))
}

/// Flags win over the config file.
fn validator_config(args: &CheckArgs, config: &CliConfig) -> ValidatorConfig {
    match args.traversal {
        Some(t) => config.validator.with_source_traversal(t.into()),
        None => config.validator,
    }
}

/// Render the outcome for stdout.
pub fn render(args: &CheckArgs, outcome: &ValidationOutcome) -> String {
    match args.format {
        OutputFormat::Text => match outcome.failing_attribute() {
            None => format!("{}: valid", args.template.display()),
            Some(attr) => format!("{}: invalid\n  {attr}", args.template.display()),
        },
        OutputFormat::Json => serde_json::json!({
            "template": args.template.display().to_string(),
            "type": args.type_name,
            "valid": outcome.is_valid(),
            "failing_attribute": outcome.failing_attribute(),
        })
        .to_string(),
    }
}
