//! Key rate sources and client margins
//!
//! The calculator only depends on the [`RateProvider`] contract:
//! - `current_annual_rate` is the primary lookup and may fail
//! - `fallback_annual_rate` is a configured constant, consulted only after
//!   the primary lookup has failed

mod provider;
mod fixed;
mod file;
mod margins;

#[cfg(test)]
pub(crate) mod testing;

pub use provider::{RateProvider, RateQuote};
pub use fixed::StaticRateProvider;
pub use file::{FileRateProvider, RateQuoteFile};
pub use margins::MarginTable;

pub use crate::error::RateSourceUnavailable;
