//! Numeric formatting for calculator displays
//!
//! Every value shown to a user goes through [`format_number`], which rounds
//! to 12 significant digits and never switches to scientific notation.

use crate::error::{CalcError, CalcResult};

/// Display sentinel for any failed computation
pub const ERROR_DISPLAY: &str = "Error";

/// Significant digits kept by [`round_to_precision`]
pub const PRECISION: usize = 12;

/// Maximum display length in basic mode
pub const BASIC_DISPLAY_LIMIT: usize = 15;

/// Maximum display length in scientific mode
pub const SCIENTIFIC_DISPLAY_LIMIT: usize = 25;

/// Round to [`PRECISION`] significant digits.
///
/// Equivalent to printing the value with 12 significant digits and parsing
/// it back. Non-finite values are returned unchanged.
pub fn round_to_precision(n: f64) -> f64 {
    if !n.is_finite() {
        return n;
    }
    format!("{:.*e}", PRECISION - 1, n)
        .parse::<f64>()
        .unwrap_or(n)
}

/// Canonical display string for a number, or `"Error"` if it is NaN or infinite
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return ERROR_DISPLAY.to_string();
    }
    let rounded = round_to_precision(n);
    // Avoid "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Truncate a display string to at most `max` characters
pub fn clamp_length(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Reject NaN and infinities with a [`CalcError::NonFinite`]
pub fn ensure_finite(value: f64, what: &str) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::non_finite(format!("{} is not a finite number", what)))
    }
}

/// Strict numeric parse: the whole (trimmed) string must be a finite number
pub fn parse_number(text: &str) -> CalcResult<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CalcError::parse(format!("Invalid number: '{}'", trimmed))),
    }
}
