//! Analysis configuration.
//!
//! Loaded from TOML (an `[analysis]` table in the CLI config, or a standalone
//! file) or built in code. Missing keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Smallest RSI lookback that produces a meaningful average.
pub const MIN_RSI_PERIOD: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Parameters for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rsi_period: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rsi_period: DEFAULT_RSI_PERIOD,
        }
    }
}

impl AnalysisConfig {
    pub fn with_rsi_period(rsi_period: usize) -> Result<Self, ConfigError> {
        let config = Self { rsi_period };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rsi_period < MIN_RSI_PERIOD {
            return Err(ConfigError::Invalid(format!(
                "rsi_period must be >= {MIN_RSI_PERIOD}, got {}",
                self.rsi_period
            )));
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
