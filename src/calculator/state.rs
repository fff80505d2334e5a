//! Amortization state tracking for a single loan

/// Where the amortization loop stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    /// Principal outstanding and the last payment reduced it
    Amortizing,
    /// Principal fully retired
    Repaid,
    /// The payment no longer reduces the principal
    Stuck,
}

/// One month of amortization, as applied by [`AmortizationState::advance_month`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthStep {
    pub month: u64,
    pub opening_principal: f64,
    pub interest: f64,
    pub principal_portion: f64,
    pub closing_principal: f64,
}

/// State of a loan between months
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Months simulated so far
    pub month: u64,

    /// Principal still owed
    pub remaining_principal: f64,

    /// Interest accumulated over all simulated months
    pub total_interest: f64,

    pub status: LoanStatus,
}

impl AmortizationState {
    pub fn new(principal: f64) -> Self {
        Self {
            month: 0,
            remaining_principal: principal,
            total_interest: 0.0,
            status: LoanStatus::Amortizing,
        }
    }

    /// Charge one month of interest and apply the payment
    ///
    /// Interest is always charged on the principal outstanding at the start of
    /// the month and added in full, including the final month. When the
    /// payment does not exceed the interest the state becomes `Stuck` and the
    /// principal is left unchanged.
    pub fn advance_month(&mut self, monthly_rate: f64, monthly_payment: f64) -> MonthStep {
        debug_assert_eq!(self.status, LoanStatus::Amortizing);

        self.month += 1;
        let opening_principal = self.remaining_principal;
        let interest = opening_principal * monthly_rate;
        self.total_interest += interest;
        let principal_portion = monthly_payment - interest;

        if principal_portion <= 0.0 {
            self.status = LoanStatus::Stuck;
        } else {
            self.remaining_principal -= principal_portion;
            if self.remaining_principal <= 0.0 {
                self.status = LoanStatus::Repaid;
            } else if self.remaining_principal == opening_principal {
                // Portion below f64 resolution at this balance: no progress possible
                self.status = LoanStatus::Stuck;
            }
        }

        MonthStep {
            month: self.month,
            opening_principal,
            interest,
            principal_portion,
            closing_principal: self.remaining_principal,
        }
    }
}
