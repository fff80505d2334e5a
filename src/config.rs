//! Calculator configuration
//!
//! Loaded from JSON (default location `config/calculator.json`); every field
//! is optional and falls back to the values below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::loan::ClientCategory;
use crate::rates::MarginTable;

/// Default path to the calculator config file
pub const DEFAULT_CONFIG_PATH: &str = "config/calculator.json";

/// Annual rate in percent used when the key rate source is down
pub const DEFAULT_FALLBACK_ANNUAL_RATE: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Fallback annual rate in percent
    ///
    /// Read only when building a rate provider (see `StaticRateProvider` and
    /// `FileRateProvider`). The calculator itself always takes the fallback
    /// from its provider's `fallback_annual_rate`.
    pub fallback_annual_rate: f64,

    /// Margins over the key rate by client category
    pub margins: MarginTable,

    /// Record the month-by-month amortization schedule
    pub detailed_output: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            fallback_annual_rate: DEFAULT_FALLBACK_ANNUAL_RATE,
            margins: MarginTable::default(),
            detailed_output: false,
        }
    }
}

impl CalculatorConfig {
    /// Parse and validate a JSON config string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                log::info!("Loading calculator config from {}", p.display());
                Self::from_json_path(p)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fallback_annual_rate.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "fallback_annual_rate",
                value: self.fallback_annual_rate,
            });
        }

        for (category, margin) in self.margins.iter() {
            if !margin.is_finite() || margin < 0.0 {
                let field = match category {
                    ClientCategory::Government => "margins.government",
                    ClientCategory::Business => "margins.business",
                    ClientCategory::Individual => "margins.individual",
                };
                return Err(ConfigError::InvalidValue { field, value: margin });
            }
        }

        Ok(())
    }
}
