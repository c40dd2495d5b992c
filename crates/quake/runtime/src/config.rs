//! Layered configuration: defaults, then an optional file, then `QUAKE_*` variables.
//!
//! Nested keys use a double underscore in the environment, for example
//! `QUAKE_STATISTICS__BIN_WIDTH=0.1` or `QUAKE_ENSEMBLE__ORIGIN_TIME_UNIT=seconds`.

use serde::{Deserialize, Serialize};

use quake_ensemble::EnsembleConfig;
use quake_statistics::MfdConfig;

use crate::error::{QuakeError, QuakeResult};

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "QUAKE";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuakeConfig {
    /// Magnitude-frequency binning and confidence level
    #[serde(default)]
    pub statistics: MfdConfig,

    /// Ensemble decoding
    #[serde(default)]
    pub ensemble: EnsembleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of plain text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl QuakeConfig {
    /// Load configuration, layering an optional file and the environment over defaults.
    pub fn load(path: Option<&str>) -> QuakeResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&QuakeConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: QuakeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> QuakeResult<()> {
        self.statistics.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(QuakeError::InvalidConfig("logging.level is empty".into()));
        }
        Ok(())
    }
}
