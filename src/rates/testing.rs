//! Scripted rate provider for unit tests

use std::sync::atomic::{AtomicU32, Ordering};

use super::RateProvider;
use crate::error::RateSourceUnavailable;

/// Provider returning a fixed outcome and counting calls to each getter
pub(crate) struct ScriptedRateProvider {
    key_rate: Option<f64>,
    fallback: f64,
    primary_calls: AtomicU32,
    fallback_calls: AtomicU32,
}

impl ScriptedRateProvider {
    pub(crate) fn responding(key_rate: f64) -> Self {
        Self::build(Some(key_rate), f64::NAN)
    }

    pub(crate) fn failing(fallback: f64) -> Self {
        Self::build(None, fallback)
    }

    fn build(key_rate: Option<f64>, fallback: f64) -> Self {
        Self {
            key_rate,
            fallback,
            primary_calls: AtomicU32::new(0),
            fallback_calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn primary_calls(&self) -> u32 {
        self.primary_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fallback_calls(&self) -> u32 {
        self.fallback_calls.load(Ordering::SeqCst)
    }
}

impl RateProvider for ScriptedRateProvider {
    fn current_annual_rate(&self) -> Result<f64, RateSourceUnavailable> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        self.key_rate
            .ok_or_else(|| RateSourceUnavailable::new("central bank not responding"))
    }

    fn fallback_annual_rate(&self) -> f64 {
        self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        self.fallback
    }
}
