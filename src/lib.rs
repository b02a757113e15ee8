//! Rendita - cash-flow ledger and yield engine for personal-finance
//! instruments
//!
//! This library provides:
//! - Term-deposit ledgers with periodic interest, 26% withholding, and
//!   optional reinvestment
//! - Fixed-coupon bond ledgers with accrued-interest proration,
//!   first-coupon tax treatment, and capital-gain taxation
//! - Money-weighted return (XIRR) over dated cash flows
//! - Calendar utilities for period stepping and day counts
//!
//! Engines are pure functions from an inputs record to a results record:
//! no I/O, no shared state, safe to call from any concurrency model.

pub mod bond;
pub mod cashflow;
pub mod dates;
pub mod deposit;
pub mod error;
pub mod xirr;

// Re-export commonly used types
pub use bond::{calculate_bond_yield, BondInputs, BondResult, CouponFrequency, SaleTerms};
pub use cashflow::{BondCashFlow, CashFlow, FlowKind};
pub use deposit::{calculate_deposit_yield, DepositInputs, DepositResult, InterestFrequency};
pub use error::EngineError;
pub use xirr::Xirr;
