//! Error types for overpayment calculation, configuration and loan loading

use thiserror::Error;

/// Errors surfaced to callers of the overpayment calculator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// The monthly payment does not cover the interest charged in `month`,
    /// so the principal can never be retired.
    #[error("loan cannot be repaid: month {month} interest {interest:.2} is not covered by payment {payment:.2}")]
    CannotBePayed {
        month: u64,
        interest: f64,
        payment: f64,
    },

    /// An input failed boundary validation before any simulation ran
    #[error("invalid {field}: {value} (must be a positive, finite amount)")]
    InvalidInput { field: &'static str, value: f64 },
}

impl CalculationError {
    /// True when the loan was rejected because it can never be repaid
    pub fn is_cannot_be_payed(&self) -> bool {
        matches!(self, CalculationError::CannotBePayed { .. })
    }
}

/// The key rate source could not be reached or returned an unusable quote.
///
/// Recovered inside the calculator by switching to the fallback rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rate source unavailable: {reason}")]
pub struct RateSourceUnavailable {
    pub reason: String,
}

impl RateSourceUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Errors loading or validating calculator configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Errors loading a loan book from CSV
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse loan book CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown client category: {0}")]
    UnknownCategory(String),

    #[error("invalid loan on row {row}: {source}")]
    InvalidLoan {
        row: usize,
        #[source]
        source: CalculationError,
    },
}
