//! Overpayment calculator: rate resolution and monthly amortization

use log::{debug, warn};

use super::schedule::{OverpaymentResult, RateSource, ResolvedRate, ScheduleRow};
use super::state::{AmortizationState, LoanStatus};
use crate::config::CalculatorConfig;
use crate::error::CalculationError;
use crate::loan::{ClientCategory, LoanRequest};
use crate::rates::{RateProvider, RateQuote};

/// Prices loans against a key rate source
///
/// Holds no mutable state; every call queries the provider afresh, so the
/// calculator can be shared across threads whenever the provider can.
pub struct OverpaymentCalculator<P> {
    provider: P,
    config: CalculatorConfig,
}

impl<P: RateProvider> OverpaymentCalculator<P> {
    pub fn new(provider: P, config: CalculatorConfig) -> Self {
        Self { provider, config }
    }

    /// Calculator with default margins and summary-only output
    pub fn with_provider(provider: P) -> Self {
        Self::new(provider, CalculatorConfig::default())
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Total interest paid until `principal` is retired by `monthly_payment`
    ///
    /// Fails with [`CalculationError::CannotBePayed`] when the payment does
    /// not cover a month's interest. A key rate outage never fails the call;
    /// the provider's fallback rate is used instead.
    pub fn calculate_overpayment(
        &self,
        principal: f64,
        monthly_payment: f64,
        category: ClientCategory,
    ) -> Result<f64, CalculationError> {
        let request = LoanRequest::new(principal, monthly_payment, category)?;
        Ok(self.calculate(&request)?.total_interest)
    }

    /// Price a loan and return the full result
    pub fn calculate(&self, request: &LoanRequest) -> Result<OverpaymentResult, CalculationError> {
        let rate = self.resolve_rate(request.category);
        amortize(request, &rate, self.config.detailed_output)
    }

    /// Query the key rate once, substituting the fallback on failure
    pub fn resolve_base_rate(&self) -> (f64, RateSource) {
        match self.provider.quote() {
            RateQuote::Current(rate) => (rate, RateSource::KeyRate),
            RateQuote::Unavailable(reason) => {
                let fallback = self.provider.fallback_annual_rate();
                warn!("{}; using fallback annual rate {}%", reason, fallback);
                (fallback, RateSource::Fallback)
            }
        }
    }

    /// Base rate plus the category margin
    pub fn resolve_rate(&self, category: ClientCategory) -> ResolvedRate {
        let (base, source) = self.resolve_base_rate();
        self.rate_for(category, base, source)
    }

    /// Apply the configured margin for `category` to an already resolved base rate
    pub fn rate_for(&self, category: ClientCategory, base: f64, source: RateSource) -> ResolvedRate {
        let rate = ResolvedRate::new(category, source, base, self.config.margins.margin(category));
        debug!(
            "{} rate: base {}% ({:?}) + margin {} = {}%",
            category, rate.base_annual_rate, rate.source, rate.margin, rate.effective_annual_rate
        );
        rate
    }
}

/// Simulate monthly amortization at a resolved rate
///
/// Runs until the remaining principal is zero or below. Stops at the first
/// month whose payment fails to reduce the principal. No rounding is applied
/// to any intermediate or final amount.
pub fn amortize(
    request: &LoanRequest,
    rate: &ResolvedRate,
    detailed_output: bool,
) -> Result<OverpaymentResult, CalculationError> {
    let mut state = AmortizationState::new(request.principal);
    let mut schedule = Vec::new();

    while state.status == LoanStatus::Amortizing {
        let step = state.advance_month(rate.monthly_rate, request.monthly_payment);

        if state.status == LoanStatus::Stuck {
            debug!(
                "Loan of {} at {}% stuck in month {}: interest {} vs payment {}",
                request.principal, rate.effective_annual_rate, step.month, step.interest,
                request.monthly_payment
            );
            return Err(CalculationError::CannotBePayed {
                month: step.month,
                interest: step.interest,
                payment: request.monthly_payment,
            });
        }

        if detailed_output {
            schedule.push(ScheduleRow::from_step(&step, request.monthly_payment, state.total_interest));
        }
    }

    Ok(OverpaymentResult {
        principal: request.principal,
        monthly_payment: request.monthly_payment,
        total_interest: state.total_interest,
        months: state.month,
        rate: *rate,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::testing::ScriptedRateProvider;
    use crate::rates::StaticRateProvider;
    use approx::assert_relative_eq;

    fn calculator(key_rate: f64) -> OverpaymentCalculator<ScriptedRateProvider> {
        OverpaymentCalculator::with_provider(ScriptedRateProvider::responding(key_rate))
    }

    #[test]
    fn test_overpayment_by_category() {
        let calc = calculator(10.0);
        let expected = [
            (ClientCategory::Government, 4858.471882221193),
            (ClientCategory::Business, 5375.544070761046),
            (ClientCategory::Individual, 5898.488001215101),
        ];

        for (category, total) in expected {
            let result = calc.calculate_overpayment(100_000.0, 10_000.0, category).unwrap();
            assert_relative_eq!(result, total, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_overpayment_grows_with_margin() {
        let calc = calculator(10.0);
        let totals: Vec<f64> = ClientCategory::ALL
            .iter()
            .map(|&c| calc.calculate_overpayment(100_000.0, 10_000.0, c).unwrap())
            .collect();

        assert!(totals[0] < totals[1]);
        assert!(totals[1] < totals[2]);
    }

    #[test]
    fn test_too_big_amount_cannot_be_payed() {
        let calc = calculator(10.0);
        let err = calc
            .calculate_overpayment(1_000_000_000.0, 10_000.0, ClientCategory::Government)
            .unwrap_err();

        match err {
            CalculationError::CannotBePayed { month, interest, payment } => {
                assert_eq!(month, 1);
                assert_relative_eq!(interest, 1e9 * 10.0 / 12.0 / 100.0, max_relative = 1e-12);
                assert_eq!(payment, 10_000.0);
            }
            other => panic!("expected CannotBePayed, got {:?}", other),
        }
    }

    #[test]
    fn test_fallback_rate_when_key_rate_unavailable() {
        let calc = OverpaymentCalculator::with_provider(ScriptedRateProvider::failing(30.0));

        let result = calc
            .calculate(&LoanRequest::new(10_000.0, 1_000.0, ClientCategory::Individual).unwrap())
            .unwrap();

        assert_eq!(calc.provider().primary_calls(), 1);
        assert_eq!(calc.provider().fallback_calls(), 1);
        assert_eq!(result.rate.source, RateSource::Fallback);
        assert_eq!(result.rate.effective_annual_rate, 32.0);
        assert_eq!(result.months, 12);
        assert_relative_eq!(result.total_interest, 1787.4208038242168, max_relative = 1e-12);
    }

    #[test]
    fn test_fallback_not_consulted_when_key_rate_available() {
        let calc = calculator(10.0);
        calc.calculate_overpayment(10_000.0, 1_000.0, ClientCategory::Individual).unwrap();

        assert_eq!(calc.provider().primary_calls(), 1);
        assert_eq!(calc.provider().fallback_calls(), 0);
    }

    #[test]
    fn test_long_credit_keeps_fractions_of_cents() {
        let calc = calculator(0.01);
        let result = calc
            .calculate(&LoanRequest::new(100.0, 1.0, ClientCategory::Individual).unwrap())
            .unwrap();

        assert_eq!(result.months, 110);
        assert_relative_eq!(result.total_interest, 9.537847726444456, max_relative = 1e-12);

        let fraction = result.total_interest % 1.0;
        let rounded_to_cents = (fraction * 100.0) % 1.0 == 0.0;
        assert!(!rounded_to_cents);
    }

    #[test]
    fn test_repeated_calls_are_bit_identical() {
        let calc = calculator(10.0);
        let first = calc.calculate_overpayment(100_000.0, 10_000.0, ClientCategory::Business).unwrap();
        let second = calc.calculate_overpayment(100_000.0, 10_000.0, ClientCategory::Business).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_invalid_input_fails_before_rate_lookup() {
        let calc = calculator(10.0);

        let err = calc
            .calculate_overpayment(0.0, 10_000.0, ClientCategory::Government)
            .unwrap_err();
        assert_eq!(err, CalculationError::InvalidInput { field: "principal", value: 0.0 });

        let err = calc
            .calculate_overpayment(100.0, -1.0, ClientCategory::Government)
            .unwrap_err();
        assert_eq!(err, CalculationError::InvalidInput { field: "monthly_payment", value: -1.0 });

        assert_eq!(calc.provider().primary_calls(), 0);
    }

    #[test]
    fn test_zero_rate_charges_no_interest() {
        let calc = OverpaymentCalculator::with_provider(StaticRateProvider::new(0.0, 30.0));
        let result = calc
            .calculate(&LoanRequest::new(1_200.0, 100.0, ClientCategory::Government).unwrap())
            .unwrap();

        assert_eq!(result.total_interest, 0.0);
        assert_eq!(result.months, 12);
    }

    #[test]
    fn test_detailed_schedule() {
        let config = CalculatorConfig {
            detailed_output: true,
            ..Default::default()
        };
        let calc = OverpaymentCalculator::new(StaticRateProvider::new(10.0, 30.0), config);
        let result = calc
            .calculate(&LoanRequest::new(100_000.0, 10_000.0, ClientCategory::Government).unwrap())
            .unwrap();

        assert_eq!(result.schedule.len(), result.months as usize);

        let first = &result.schedule[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.opening_principal, 100_000.0);
        assert_relative_eq!(first.interest, 100_000.0 * 10.0 / 12.0 / 100.0, max_relative = 1e-12);

        for pair in result.schedule.windows(2) {
            assert_eq!(pair[1].opening_principal, pair[0].closing_principal);
            assert!(pair[1].interest < pair[0].interest);
        }

        let last = result.schedule.last().unwrap();
        assert!(last.closing_principal <= 0.0);
        assert_eq!(last.cumulative_interest, result.total_interest);
        assert!(result.final_payment().unwrap() < result.monthly_payment);
    }

    #[test]
    fn test_summary_output_has_no_schedule() {
        let calc = calculator(10.0);
        let result = calc
            .calculate(&LoanRequest::new(100_000.0, 10_000.0, ClientCategory::Government).unwrap())
            .unwrap();
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_custom_margins() {
        let mut config = CalculatorConfig::default();
        config.margins.individual = 0.0;
        let calc = OverpaymentCalculator::new(ScriptedRateProvider::responding(10.0), config);

        let government = calc.calculate_overpayment(100_000.0, 10_000.0, ClientCategory::Government).unwrap();
        let individual = calc.calculate_overpayment(100_000.0, 10_000.0, ClientCategory::Individual).unwrap();
        assert_eq!(government.to_bits(), individual.to_bits());
    }

    #[test]
    fn test_fallback_comes_from_provider_not_config() {
        let config = CalculatorConfig {
            fallback_annual_rate: 40.0,
            ..Default::default()
        };
        let calc = OverpaymentCalculator::new(StaticRateProvider::unavailable(25.0), config);

        let rate = calc.resolve_rate(ClientCategory::Government);
        assert_eq!(rate.source, RateSource::Fallback);
        assert_eq!(rate.base_annual_rate, 25.0);
    }
}
