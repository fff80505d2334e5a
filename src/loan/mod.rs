//! Loan request data structures and loan book loading

mod data;
pub mod loader;

pub use data::{ClientCategory, LoanRequest};
pub use loader::{load_loan_requests, load_loan_requests_from_reader};
