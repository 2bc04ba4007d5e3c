//! # tplv CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tplv_cli::check::{run_check, CheckArgs};
use tplv_cli::config::CliConfig;
use tplv_cli::schema::{run_schema, SchemaArgs};
use tplv_cli::{EXIT_INVALID, EXIT_LOAD_FAILURE};

/// Static checker for linked-data templates.
///
/// Verifies that every expression bound in a template resolves to a
/// property of the schema type in effect where it is used.
#[derive(Parser, Debug)]
#[command(name = "tplv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a template against a schema catalog.
    Check(CheckArgs),

    /// List the types and properties declared by a schema catalog.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match dispatch(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_INVALID)
        }
    }
}

/// Load the configuration and run the selected subcommand.
fn dispatch(cli: &Cli) -> anyhow::Result<u8> {
    let config = match CliConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return Ok(EXIT_LOAD_FAILURE);
        }
    };
    match &cli.command {
        Commands::Check(args) => run_check(args, &config),
        Commands::Schema(args) => run_schema(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tplv_cli::check::{OutputFormat, TraversalArg};

    #[test]
    fn cli_parse_check_minimal() {
        let cli = Cli::try_parse_from([
            "tplv",
            "check",
            "--catalog",
            "catalog.yaml",
            "--template",
            "template.yaml",
            "--type",
            "st:Observation",
        ])
        .unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.catalog, PathBuf::from("catalog.yaml"));
            assert_eq!(args.template, PathBuf::from("template.yaml"));
            assert_eq!(args.type_name, "st:Observation");
            assert!(args.traversal.is_none());
            assert!(args.template_schema.is_none());
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("expected check subcommand");
        }
    }

    #[test]
    fn cli_parse_check_all_options() {
        let cli = Cli::try_parse_from([
            "tplv",
            "-vv",
            "--config",
            "tplv.yaml",
            "check",
            "--catalog",
            "c.json",
            "--template",
            "t.json",
            "--type",
            "Observation",
            "--traversal",
            "first-source",
            "--template-schema",
            "custom.schema.json",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("tplv.yaml")));
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.traversal, Some(TraversalArg::FirstSource));
            assert_eq!(args.template_schema, Some(PathBuf::from("custom.schema.json")));
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("expected check subcommand");
        }
    }

    #[test]
    fn cli_parse_check_requires_type() {
        let result = Cli::try_parse_from([
            "tplv",
            "check",
            "--catalog",
            "c.yaml",
            "--template",
            "t.yaml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_schema() {
        let cli = Cli::try_parse_from(["tplv", "schema", "--catalog", "c.yaml", "--type", "st:Station"])
            .unwrap();
        if let Commands::Schema(args) = cli.command {
            assert_eq!(args.catalog, PathBuf::from("c.yaml"));
            assert_eq!(args.type_name.as_deref(), Some("st:Station"));
        } else {
            panic!("expected schema subcommand");
        }
    }

    #[test]
    fn cli_rejects_unknown_traversal() {
        let result = Cli::try_parse_from([
            "tplv",
            "check",
            "--catalog",
            "c.yaml",
            "--template",
            "t.yaml",
            "--type",
            "T",
            "--traversal",
            "sideways",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unreadable_config_is_load_failure() {
        let cli = Cli::try_parse_from([
            "tplv",
            "--config",
            "/nonexistent/tplv.yaml",
            "schema",
            "--catalog",
            "c.yaml",
        ])
        .unwrap();
        assert_eq!(dispatch(&cli).unwrap(), EXIT_LOAD_FAILURE);
    }
}
