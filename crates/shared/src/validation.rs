//! Input normalization and validation helpers.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Everything that cannot be part of a plain decimal number.
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9.\-]+").unwrap();
}

/// Parses a displayed daily rate such as `"$1,200/day"` into a number.
///
/// Currency symbols, thousands separators and unit suffixes are dropped
/// before parsing. Returns `None` when nothing numeric remains.
pub fn parse_daily_rate(display: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC.replace_all(display, "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validates that a daily rate is a finite, non-negative number.
pub fn validate_daily_rate(rate: f64) -> Result<(), ValidationError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("daily_rate");
        err.message = Some("Price must be a non-negative number".into());
        Err(err)
    }
}

/// Validates that a label is not empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Maps empty or whitespace-only optional text to `None`.
///
/// Non-empty text is returned unchanged.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Canonical form of an email address for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
