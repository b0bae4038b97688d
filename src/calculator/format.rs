//! Number formatting and literal parsing
//!
//! The boundary between text and numbers. Engine state stores `f64`
//! operands; only the in-progress entry is kept as text.

use super::error::CalcError;

/// Magnitude at or above which numbers switch to exponent form
const EXPONENT_ABOVE: f64 = 1e21;

/// Magnitude below which non-zero numbers switch to exponent form
const EXPONENT_BELOW: f64 = 1e-6;

/// Render a number the way the calculator displays it
///
/// Shortest representation that round-trips, no trailing `.0` on integral
/// values, `-0` collapsed to `0`, and exponent form for very large or very
/// small magnitudes.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENT_ABOVE || magnitude < EXPONENT_BELOW {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Parse a numeric literal typed into (or echoed back to) the entry buffer
///
/// Accepts everything `format_number` produces plus in-progress forms like
/// `"5."` and `"05"`. A lone sign is not a number.
pub fn parse_literal(text: &str) -> Result<f64, CalcError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Err(CalcError::MalformedLiteral(text.to_string()));
    }

    trimmed
        .parse::<f64>()
        .map_err(|_| CalcError::MalformedLiteral(text.to_string()))
}
