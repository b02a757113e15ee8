//! Deposit inputs and results records

use serde::{Deserialize, Serialize};

use crate::cashflow::CashFlow;

/// How often the deposit pays interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestFrequency {
    /// Once per year
    Annual,
    /// Four times per year
    Quarterly,
    /// Twelve times per year
    Monthly,
}

impl InterestFrequency {
    /// Payments per year
    pub fn per_year(&self) -> u32 {
        match self {
            InterestFrequency::Annual => 1,
            InterestFrequency::Quarterly => 4,
            InterestFrequency::Monthly => 12,
        }
    }

    /// Months between consecutive interest payments
    pub fn period_months(&self) -> u32 {
        12 / self.per_year()
    }
}

/// Terms of a fixed-term interest deposit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositInputs {
    /// Principal paid in at the start
    pub amount: f64,

    /// Start date, ISO `YYYY-MM-DD`
    pub start_date: String,

    /// Nominal annual interest rate in percent (5.0 = 5%)
    pub annual_rate: f64,

    /// Interest payment frequency
    pub frequency: InterestFrequency,

    /// Total duration in months
    pub duration_months: u32,

    /// Lock-in period in months. Informational only; it does not affect
    /// the ledger.
    #[serde(default)]
    pub lock_in_months: u32,

    /// Whether post-tax interest is rolled into the balance for
    /// subsequent periods
    pub reinvest: bool,
}

/// Computed deposit ledger and summary metrics.
///
/// Monetary and percentage metrics are formatted to 2 decimal places for
/// direct display; the ledger keeps full-precision amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositResult {
    /// The complete dated ledger, in generation order
    pub cash_flows: Vec<CashFlow>,

    /// Principal paid in
    pub initial_capital: String,

    /// Sum of gross interest over all periods
    pub total_gross_interest: String,

    /// Gross interest net of the 26% withholding
    pub total_net_interest: String,

    /// Total tax withheld
    pub total_tax: String,

    /// Principal plus net interest at the end of the term
    pub final_capital: String,

    /// Effective annualized gross yield, percent
    pub effective_gross_yield: String,

    /// Effective annualized net yield, percent
    pub effective_net_yield: String,
}
