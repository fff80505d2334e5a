//! Credit Calculator - loan overpayment pricing
//!
//! This library provides:
//! - Key rate resolution with fallback when the rate source is down
//! - Client category margins over the key rate
//! - Month-by-month amortization summing the total interest paid
//! - Batch pricing of CSV loan books

pub mod error;
pub mod config;
pub mod loan;
pub mod rates;
pub mod calculator;
pub mod batch;

// Re-export commonly used types
pub use error::{CalculationError, ConfigError, LoadError, RateSourceUnavailable};
pub use config::CalculatorConfig;
pub use loan::{ClientCategory, LoanRequest};
pub use rates::{RateProvider, RateQuote, StaticRateProvider, FileRateProvider, MarginTable};
pub use calculator::{OverpaymentCalculator, OverpaymentResult, ScheduleRow, RateSource};
pub use batch::{BatchRunner, BatchReport};
