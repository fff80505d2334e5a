//! Load loan requests from a CSV loan book
//!
//! Expected columns: `principal,monthly_payment,category` plus an optional
//! `loan_id` column.

use super::{ClientCategory, LoanRequest};
use crate::error::LoadError;
use csv::{Reader, Trim};
use std::path::Path;

/// Raw CSV row of a loan book
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    loan_id: Option<String>,
    principal: f64,
    monthly_payment: f64,
    category: String,
}

impl CsvRow {
    fn to_request(self, row: usize) -> Result<LoanRequest, LoadError> {
        let category: ClientCategory = self.category.parse()?;
        let request = LoanRequest::new(self.principal, self.monthly_payment, category)
            .map_err(|source| LoadError::InvalidLoan { row, source })?;

        Ok(match self.loan_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => request.with_id(id),
            None => request,
        })
    }
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<LoanRequest>, LoadError> {
    let mut requests = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // 1-indexed data rows, header excluded
        requests.push(row.to_request(idx + 1)?);
    }

    log::debug!("Loaded {} loan requests", requests.len());
    Ok(requests)
}

/// Load all loan requests from a CSV file
pub fn load_loan_requests<P: AsRef<Path>>(path: P) -> Result<Vec<LoanRequest>, LoadError> {
    let reader = csv::ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    read_rows(reader)
}

/// Load loan requests from any reader (e.g., string buffer, stdin)
pub fn load_loan_requests_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<LoanRequest>, LoadError> {
    read_rows(csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader))
}
