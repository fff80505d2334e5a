//! Key rate read from a published JSON quote file
//!
//! Quote format:
//! ```json
//! { "annual_rate": 16.0, "as_of": "2026-10-01", "source": "CBR" }
//! ```
//! Any problem reading the quote (missing file, bad JSON, stale date) is
//! reported as [`RateSourceUnavailable`].

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::RateProvider;
use crate::error::RateSourceUnavailable;

/// Contents of a key rate quote file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuoteFile {
    /// Annual key rate in percent
    pub annual_rate: f64,
    /// Date the rate was published
    pub as_of: NaiveDate,
    /// Free-form publisher name
    #[serde(default)]
    pub source: Option<String>,
}

/// Rate provider that reads the key rate from a JSON file on every lookup
#[derive(Debug, Clone)]
pub struct FileRateProvider {
    path: PathBuf,
    fallback: f64,
    /// Quotes older than this many days are treated as unavailable
    max_age_days: Option<i64>,
    /// Valuation date for the staleness check (defaults to today)
    today: Option<NaiveDate>,
}

impl FileRateProvider {
    pub fn new(path: impl Into<PathBuf>, fallback: f64) -> Self {
        Self {
            path: path.into(),
            fallback,
            max_age_days: None,
            today: None,
        }
    }

    /// Reject quotes published more than `days` before the valuation date
    pub fn with_max_age_days(mut self, days: i64) -> Self {
        self.max_age_days = Some(days);
        self
    }

    /// Fix the valuation date instead of using the local clock
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_quote(&self) -> Result<RateQuoteFile, RateSourceUnavailable> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            RateSourceUnavailable::new(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&text).map_err(|e| {
            RateSourceUnavailable::new(format!("malformed quote in {}: {}", self.path.display(), e))
        })
    }
}

impl RateProvider for FileRateProvider {
    fn current_annual_rate(&self) -> Result<f64, RateSourceUnavailable> {
        let quote = self.read_quote()?;

        if let Some(max_age) = self.max_age_days {
            let today = self.today.unwrap_or_else(|| Local::now().date_naive());
            let age = (today - quote.as_of).num_days();
            if age > max_age {
                return Err(RateSourceUnavailable::new(format!(
                    "quote from {} is {} days old (limit {})",
                    quote.as_of, age, max_age
                )));
            }
        }

        log::debug!(
            "Key rate {}% as of {} ({})",
            quote.annual_rate,
            quote.as_of,
            quote.source.as_deref().unwrap_or("unknown source")
        );

        Ok(quote.annual_rate)
    }

    fn fallback_annual_rate(&self) -> f64 {
        self.fallback
    }
}
