//! In-memory rate provider

use super::RateProvider;
use crate::error::RateSourceUnavailable;

/// Rate provider backed by configured values
///
/// With no key rate set, every primary lookup reports the source as
/// unavailable and the calculator runs on the fallback rate.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticRateProvider {
    key_rate: Option<f64>,
    fallback: f64,
}

impl StaticRateProvider {
    pub fn new(key_rate: f64, fallback: f64) -> Self {
        Self { key_rate: Some(key_rate), fallback }
    }

    /// Provider whose primary source is always down
    pub fn unavailable(fallback: f64) -> Self {
        Self { key_rate: None, fallback }
    }
}

impl RateProvider for StaticRateProvider {
    fn current_annual_rate(&self) -> Result<f64, RateSourceUnavailable> {
        self.key_rate
            .ok_or_else(|| RateSourceUnavailable::new("no key rate configured"))
    }

    fn fallback_annual_rate(&self) -> f64 {
        self.fallback
    }
}
