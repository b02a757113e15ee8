//! Term-deposit cash-flow and yield engine

mod data;
mod engine;

pub use data::{DepositInputs, DepositResult, InterestFrequency};
pub use engine::calculate_deposit_yield;
