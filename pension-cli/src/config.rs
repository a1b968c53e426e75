//! TOML configuration for the command-line front end.
//!
//! Every section and key is optional; anything left out keeps its default.
//!
//! ```toml
//! [estimator]
//! max_payout = "3000000"
//! survivor_retention = "0.85"
//! public_ratio = "1.0"
//! appraised_ratio = "0.9"
//! unit_land_value = "100000000"
//!
//! [tables]
//! factors = "custom_factors.csv"
//!
//! [logging]
//! level = "info"
//! file = "farmland-pension.log"
//! ```

use std::path::{Path, PathBuf};

use pension_core::EstimatorConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where factor tables come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    /// Custom age factor CSV. The built-in table is used when unset.
    pub factors: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Any `EnvFilter` directive, e.g. `debug` or `pension_core=trace`.
    pub level: Option<String>,
    /// File that receives a copy of every log record.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub estimator: EstimatorConfig,
    pub tables: TablesConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
