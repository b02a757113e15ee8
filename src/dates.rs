//! Calendar utilities for period stepping and date formatting
//!
//! All engine arithmetic runs on `chrono::NaiveDate`. Dates enter the
//! system as ISO `YYYY-MM-DD` strings and leave it as `DD/MM/YYYY`
//! display strings.

use chrono::{Months, NaiveDate};

use crate::error::EngineError;

/// ISO input format for dates in inputs records
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Display format used in ledger output
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Add `months` calendar months to `date`, clamping to the end of the
/// target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    // checked_add_months only fails past year 262143
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Signed day count `b - a`
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Parse an ISO `YYYY-MM-DD` date from an inputs record.
///
/// `field` names the offending input field in the error.
pub fn parse_iso(field: &str, value: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(value, ISO_FORMAT).map_err(|_| EngineError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Parse a `DD/MM/YYYY` display date back into a `NaiveDate`
pub fn parse_display(field: &str, value: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(value, DISPLAY_FORMAT).map_err(|_| EngineError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Format a date for ledger display
pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Serde helper so ledger entries serialize their dates as `DD/MM/YYYY`.
///
/// Usage: `#[serde(with = "crate::dates::display_format")]`
pub mod display_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DISPLAY_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DISPLAY_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DISPLAY_FORMAT).map_err(serde::de::Error::custom)
    }
}
