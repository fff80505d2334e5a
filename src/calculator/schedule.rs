//! Calculation output structures

use serde::{Deserialize, Serialize};

use super::state::MonthStep;
use crate::loan::ClientCategory;

/// Where the base annual rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    /// Primary key rate lookup succeeded
    KeyRate,
    /// Primary lookup failed; configured fallback rate used
    Fallback,
}

/// Rate inputs for one calculation, all annual figures in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRate {
    pub category: ClientCategory,
    pub source: RateSource,
    pub base_annual_rate: f64,
    pub margin: f64,
    pub effective_annual_rate: f64,
    /// Fraction charged per month (effective / 12 / 100)
    pub monthly_rate: f64,
}

impl ResolvedRate {
    pub fn new(category: ClientCategory, source: RateSource, base_annual_rate: f64, margin: f64) -> Self {
        let effective_annual_rate = base_annual_rate + margin;
        Self {
            category,
            source,
            base_annual_rate,
            margin,
            effective_annual_rate,
            monthly_rate: effective_annual_rate / 12.0 / 100.0,
        }
    }
}

/// A single row of the amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u64,
    pub opening_principal: f64,
    pub payment: f64,
    pub interest: f64,
    pub principal_portion: f64,
    /// Negative in the final month when the payment overshoots
    pub closing_principal: f64,
    pub cumulative_interest: f64,
}

impl ScheduleRow {
    pub(crate) fn from_step(step: &MonthStep, payment: f64, cumulative_interest: f64) -> Self {
        Self {
            month: step.month,
            opening_principal: step.opening_principal,
            payment,
            interest: step.interest,
            principal_portion: step.principal_portion,
            closing_principal: step.closing_principal,
            cumulative_interest,
        }
    }
}

/// Complete result of pricing one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverpaymentResult {
    pub principal: f64,
    pub monthly_payment: f64,

    /// Total interest paid over the life of the loan, unrounded
    pub total_interest: f64,

    /// Number of payments until the principal is retired
    pub months: u64,

    pub rate: ResolvedRate,

    /// Month-by-month rows, empty unless detailed output is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleRow>,
}

impl OverpaymentResult {
    /// Principal plus interest
    pub fn total_paid(&self) -> f64 {
        self.principal + self.total_interest
    }

    /// Amount of the final, possibly partial, payment actually needed
    pub fn final_payment(&self) -> Option<f64> {
        self.schedule
            .last()
            .map(|row| row.opening_principal + row.interest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolved_rate() {
        let rate = ResolvedRate::new(ClientCategory::Individual, RateSource::Fallback, 30.0, 2.0);
        assert_eq!(rate.effective_annual_rate, 32.0);
        assert_relative_eq!(rate.monthly_rate, 32.0 / 1200.0, max_relative = 1e-15);
    }

    #[test]
    fn test_total_paid() {
        let result = OverpaymentResult {
            principal: 1_000.0,
            monthly_payment: 100.0,
            total_interest: 58.5,
            months: 11,
            rate: ResolvedRate::new(ClientCategory::Individual, RateSource::KeyRate, 10.0, 2.0),
            schedule: Vec::new(),
        };
        assert_eq!(result.total_paid(), 1_058.5);
        assert_eq!(result.final_payment(), None);
    }

    #[test]
    fn test_empty_schedule_not_serialized() {
        let result = OverpaymentResult {
            principal: 1_000.0,
            monthly_payment: 100.0,
            total_interest: 0.0,
            months: 10,
            rate: ResolvedRate::new(ClientCategory::Government, RateSource::KeyRate, 0.0, 0.0),
            schedule: Vec::new(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("schedule"));
        assert!(json.contains("\"source\":\"KeyRate\""));
    }
}
