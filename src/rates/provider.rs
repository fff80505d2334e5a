//! Rate provider contract consumed by the calculator

use crate::error::RateSourceUnavailable;

/// Outcome of the primary key rate lookup
#[derive(Debug, Clone, PartialEq)]
pub enum RateQuote {
    /// Annual key rate in percent (10.0 means 10%)
    Current(f64),
    /// The source could not provide a usable rate
    Unavailable(RateSourceUnavailable),
}

/// Source of the central bank key rate
///
/// Rates are annual percentages: `10.0` means 10% per year.
pub trait RateProvider {
    /// Primary lookup of the current key rate
    fn current_annual_rate(&self) -> Result<f64, RateSourceUnavailable>;

    /// Configured fallback rate, used only when the primary lookup fails
    fn fallback_annual_rate(&self) -> f64;

    /// Run the primary lookup and fold the result into a [`RateQuote`]
    ///
    /// A non-finite rate is reported as unavailable. Never calls
    /// `fallback_annual_rate`.
    fn quote(&self) -> RateQuote {
        match self.current_annual_rate() {
            Ok(rate) if rate.is_finite() => RateQuote::Current(rate),
            Ok(rate) => RateQuote::Unavailable(RateSourceUnavailable::new(format!(
                "non-finite key rate {}",
                rate
            ))),
            Err(e) => RateQuote::Unavailable(e),
        }
    }
}

impl<P: RateProvider + ?Sized> RateProvider for &P {
    fn current_annual_rate(&self) -> Result<f64, RateSourceUnavailable> {
        (**self).current_annual_rate()
    }

    fn fallback_annual_rate(&self) -> f64 {
        (**self).fallback_annual_rate()
    }
}

impl<P: RateProvider + ?Sized> RateProvider for Box<P> {
    fn current_annual_rate(&self) -> Result<f64, RateSourceUnavailable> {
        (**self).current_annual_rate()
    }

    fn fallback_annual_rate(&self) -> f64 {
        (**self).fallback_annual_rate()
    }
}
