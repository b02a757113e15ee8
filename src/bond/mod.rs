//! Fixed-coupon bond cash-flow and yield engine

mod data;
mod engine;

pub use data::{BondInputs, BondResult, CouponFrequency, SaleTerms};
pub use engine::calculate_bond_yield;
