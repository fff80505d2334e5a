//! Batch pricing of loan books
//!
//! Resolves the key rate once, then prices every loan in parallel against
//! that rate, so one lookup failure or success applies to the whole book.

use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;

use crate::calculator::{amortize, OverpaymentCalculator, OverpaymentResult, RateSource};
use crate::config::CalculatorConfig;
use crate::error::CalculationError;
use crate::loan::{ClientCategory, LoanRequest};
use crate::rates::RateProvider;

/// Pricing outcome for one loan of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub request: LoanRequest,
    pub result: Result<OverpaymentResult, CalculationError>,
}

/// Results for a whole loan book, in input order
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub base_annual_rate: f64,
    pub rate_source: RateSource,
    pub outcomes: Vec<BatchOutcome>,
}

/// Aggregate figures for a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub priced: usize,
    pub rejected: usize,
    pub total_principal: f64,
    pub total_interest: f64,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let priced: Vec<&OverpaymentResult> =
            self.outcomes.iter().filter_map(|o| o.result.as_ref().ok()).collect();

        BatchSummary {
            priced: priced.len(),
            rejected: self.outcomes.len() - priced.len(),
            total_principal: priced.iter().map(|r| r.principal).sum(),
            total_interest: priced.iter().map(|r| r.total_interest).sum(),
        }
    }
}

/// Batch runner wrapping a calculator
///
/// # Example
/// ```ignore
/// let runner = BatchRunner::new(StaticRateProvider::new(16.0, 30.0), CalculatorConfig::default());
/// let loans = load_loan_requests("loans.csv")?;
/// let report = runner.run(&loans);
/// ```
pub struct BatchRunner<P> {
    calculator: OverpaymentCalculator<P>,
}

impl<P: RateProvider + Sync> BatchRunner<P> {
    pub fn new(provider: P, config: CalculatorConfig) -> Self {
        Self {
            calculator: OverpaymentCalculator::new(provider, config),
        }
    }

    pub fn with_calculator(calculator: OverpaymentCalculator<P>) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &OverpaymentCalculator<P> {
        &self.calculator
    }

    /// Price every loan; unpayable loans are reported, not fatal
    pub fn run(&self, loans: &[LoanRequest]) -> BatchReport {
        let (base, source) = self.calculator.resolve_base_rate();
        let government = self.calculator.rate_for(ClientCategory::Government, base, source);
        let business = self.calculator.rate_for(ClientCategory::Business, base, source);
        let individual = self.calculator.rate_for(ClientCategory::Individual, base, source);
        let detailed = self.calculator.config().detailed_output;

        let outcomes: Vec<BatchOutcome> = loans
            .par_iter()
            .map(|request| {
                let rate = match request.category {
                    ClientCategory::Government => &government,
                    ClientCategory::Business => &business,
                    ClientCategory::Individual => &individual,
                };
                BatchOutcome {
                    request: request.clone(),
                    result: amortize(request, rate, detailed),
                }
            })
            .collect();

        let report = BatchReport {
            base_annual_rate: base,
            rate_source: source,
            outcomes,
        };

        let summary = report.summary();
        log::info!(
            "Priced {} loans ({} rejected) at base rate {}% ({:?})",
            summary.priced, summary.rejected, base, source
        );
        report
    }
}

/// Flat CSV record of one batch outcome
#[derive(Debug, Serialize)]
struct OutcomeRecord<'a> {
    loan_id: &'a str,
    category: ClientCategory,
    principal: f64,
    monthly_payment: f64,
    effective_annual_rate: Option<f64>,
    months: Option<u64>,
    total_interest: Option<f64>,
    error: Option<String>,
}

/// Write batch outcomes as CSV
pub fn write_outcomes_csv<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        let (rate, months, interest, error) = match &outcome.result {
            Ok(r) => (Some(r.rate.effective_annual_rate), Some(r.months), Some(r.total_interest), None),
            Err(e) => (None, None, None, Some(e.to_string())),
        };

        csv_writer.serialize(OutcomeRecord {
            loan_id: outcome.request.loan_id.as_deref().unwrap_or(""),
            category: outcome.request.category,
            principal: outcome.request.principal,
            monthly_payment: outcome.request.monthly_payment,
            effective_annual_rate: rate,
            months,
            total_interest: interest,
            error,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
