//! Overpayment calculation for single loans

mod state;
mod engine;
mod schedule;

pub use state::{AmortizationState, LoanStatus, MonthStep};
pub use engine::{amortize, OverpaymentCalculator};
pub use schedule::{OverpaymentResult, RateSource, ResolvedRate, ScheduleRow};
