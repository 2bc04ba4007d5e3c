//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every field has a default, and
//! command-line flags take precedence over the file.
//!
//! ```yaml
//! validator:
//!   source_traversal: first_source
//! template_schema: schemas/template.schema.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tplv_check::ValidatorConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub validator: ValidatorConfig,
    /// Template schema to use instead of the embedded one.
    pub template_schema: Option<PathBuf>,
}

impl CliConfig {
    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    /// The file at `path` if one was given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::debug!(config = %path.display(), ?config, "loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
