//! Cash-flow ledger entry types
//!
//! Sign convention: outflows (purchases, fees, taxes, withdrawals) are
//! negative; inflows (deposit received, coupons, redemption, interest)
//! are positive. Entries are kept in chronological generation order and
//! never re-sorted; only the view handed to the XIRR solver is sorted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Economic category of a ledger entry.
///
/// Yield aggregation filters on this tag (gross views drop `Tax` rows)
/// instead of matching on description text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowKind {
    /// Principal in or out (initial deposit, purchase, withdrawal, redemption)
    Principal,
    /// Periodic interest or coupon income
    Interest,
    /// Tax withheld on interest, accrued interest, or capital gain
    Tax,
    /// Broker commission
    Commission,
    /// Accrued interest paid at purchase or received at sale
    AccruedInterest,
}

impl FlowKind {
    pub fn is_tax(&self) -> bool {
        matches!(self, FlowKind::Tax)
    }
}

/// A single row of a deposit ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlow {
    /// Event date, displayed as DD/MM/YYYY
    #[serde(with = "crate::dates::display_format")]
    pub date: NaiveDate,

    /// Human-readable label for the event
    pub description: String,

    /// Signed amount
    pub amount: f64,

    /// Account balance after this event
    pub balance: f64,

    /// Economic category
    pub kind: FlowKind,
}

/// A single row of a bond ledger
///
/// Same shape as [`CashFlow`] but carries the event rescaled to a
/// notional face value of 100 instead of a running balance, for
/// comparison across bonds of different sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondCashFlow {
    /// Event date, displayed as DD/MM/YYYY
    #[serde(with = "crate::dates::display_format")]
    pub date: NaiveDate,

    /// Human-readable label for the event
    pub description: String,

    /// Signed amount
    pub amount: f64,

    /// The same event rescaled to 100 units of face value
    pub base100: f64,

    /// Economic category
    pub kind: FlowKind,
}

/// Format a metric for final presentation: fixed 2 decimal places.
///
/// Internal computation stays at full f64 precision; only the results
/// record carries formatted text.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}
