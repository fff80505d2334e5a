//! Client categories and validated loan requests

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalculationError, LoadError};

/// Client category, which selects the margin added to the key rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClientCategory {
    /// State bodies and municipalities
    Government,
    /// Legal entities
    Business,
    /// Private persons
    Individual,
}

impl ClientCategory {
    pub const ALL: [ClientCategory; 3] = [
        ClientCategory::Government,
        ClientCategory::Business,
        ClientCategory::Individual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientCategory::Government => "government",
            ClientCategory::Business => "business",
            ClientCategory::Individual => "individual",
        }
    }
}

impl fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientCategory {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            // Legacy loan books spell it "goverment"
            "government" | "goverment" => Ok(ClientCategory::Government),
            "business" => Ok(ClientCategory::Business),
            "individual" => Ok(ClientCategory::Individual),
            _ => Err(LoadError::UnknownCategory(s.to_string())),
        }
    }
}

/// A single loan to be priced
///
/// Construct through [`LoanRequest::new`], which rejects non-positive or
/// non-finite amounts before any simulation runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanRequest {
    /// Optional identifier carried through batch output
    pub loan_id: Option<String>,
    pub principal: f64,
    pub monthly_payment: f64,
    pub category: ClientCategory,
}

impl LoanRequest {
    pub fn new(
        principal: f64,
        monthly_payment: f64,
        category: ClientCategory,
    ) -> Result<Self, CalculationError> {
        validate_amount("principal", principal)?;
        validate_amount("monthly_payment", monthly_payment)?;

        Ok(Self {
            loan_id: None,
            principal,
            monthly_payment,
            category,
        })
    }

    /// Attach an identifier (used by the loan book loader)
    pub fn with_id(mut self, loan_id: impl Into<String>) -> Self {
        self.loan_id = Some(loan_id.into());
        self
    }
}

fn validate_amount(field: &'static str, value: f64) -> Result<(), CalculationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalculationError::InvalidInput { field, value })
    }
}
