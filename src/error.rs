//! Error taxonomy for the engine boundary
//!
//! Input malformation is a hard failure; numeric non-convergence in the
//! solver is not an error (see `crate::xirr::Xirr`).

use thiserror::Error;

/// Errors returned by the deposit and bond engines
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date field did not parse in the expected format
    #[error("invalid date in field `{field}`: `{value}`")]
    InvalidDate { field: String, value: String },

    /// A numeric-string field (coupon rate, nominal value) did not parse
    #[error("invalid number in field `{field}`: `{value}`")]
    InvalidNumber { field: String, value: String },
}

/// Parse a string-typed numeric input field.
///
/// Callers may pass locale-formatted text with a decimal comma; that is
/// accepted here rather than rejected.
pub fn parse_numeric(field: &str, value: &str) -> Result<f64, EngineError> {
    let normalized = value.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| EngineError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}
