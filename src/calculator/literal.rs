//! The current entry: a numeric literal being typed
//!
//! Kept as text so in-progress forms survive (`"0."`, `"-"`, `"12.50"`).
//! Converted to `f64` only when committed.

use super::error::CalcError;
use super::format::{format_number, parse_literal};

/// In-progress numeric literal
#[derive(Debug, Clone, PartialEq)]
pub struct EntryBuffer {
    text: String,
}

impl EntryBuffer {
    /// Start a new entry with a single digit
    pub fn digit(d: u8) -> Option<Self> {
        let c = char::from_digit(d as u32, 10)?;
        Some(Self { text: c.to_string() })
    }

    /// Start a new entry at `"0."`
    pub fn decimal() -> Self {
        Self { text: "0.".to_string() }
    }

    /// Start a negative literal: a lone `"-"` awaiting digits
    pub fn minus() -> Self {
        Self { text: "-".to_string() }
    }

    /// Echo an evaluated result back into the entry
    pub fn echo(value: f64) -> Self {
        Self { text: format_number(value) }
    }

    /// Entry with pre-validated text (history recall)
    pub fn typed(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters (the unit of the input limit)
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// True while the entry is just a leading minus sign
    pub fn is_sign_only(&self) -> bool {
        self.text == "-"
    }

    pub fn has_decimal_point(&self) -> bool {
        self.text.contains('.')
    }

    /// True if keys can still extend the text
    ///
    /// Negate and percent can leave exponent form (`"2e-8"`) or a non-finite
    /// value (`"NaN"`); appending to those would not be a number any more.
    pub fn is_extendable(&self) -> bool {
        self.text
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
    }

    /// Append a digit; returns false at the length limit
    pub fn push_digit(&mut self, d: u8, limit: usize) -> bool {
        let Some(c) = char::from_digit(d as u32, 10) else {
            return false;
        };
        if self.len() >= limit || !self.is_extendable() {
            return false;
        }
        self.text.push(c);
        true
    }

    /// Append a decimal point, inserting a leading zero after a bare sign
    ///
    /// Returns false if a point is already present, the text is in exponent
    /// form or there is no room.
    pub fn push_decimal_point(&mut self, limit: usize) -> bool {
        if self.has_decimal_point() || !self.is_extendable() {
            return false;
        }
        let needed = if self.is_sign_only() { 2 } else { 1 };
        if self.len() + needed > limit {
            return false;
        }
        if self.is_sign_only() {
            self.text.push('0');
        }
        self.text.push('.');
        true
    }

    /// Numeric value of the entry
    pub fn value(&self) -> Result<f64, CalcError> {
        parse_literal(&self.text)
    }

    /// Replace the text with a transformed value (negate, percent)
    pub fn map_value(&self, f: impl Fn(f64) -> f64) -> Result<Self, CalcError> {
        let value = self.value()?;
        Ok(Self { text: format_number(f(value)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_concatenate_exactly() {
        let mut entry = EntryBuffer::digit(0).unwrap();
        for d in [5, 0, 7] {
            assert!(entry.push_digit(d, 12));
        }
        assert_eq!(entry.as_str(), "0507");
        assert_eq!(entry.value(), Ok(507.0));
    }

    #[test]
    fn test_length_limit() {
        let mut entry = EntryBuffer::digit(1).unwrap();
        for _ in 0..20 {
            entry.push_digit(9, 12);
        }
        assert_eq!(entry.len(), 12);
        assert!(!entry.push_digit(9, 12));
        assert!(!entry.push_decimal_point(12));
    }

    #[test]
    fn test_decimal_point_idempotent() {
        let mut entry = EntryBuffer::digit(3).unwrap();
        assert!(entry.push_decimal_point(12));
        assert!(!entry.push_decimal_point(12));
        entry.push_digit(5, 12);
        assert_eq!(entry.as_str(), "3.5");
    }

    #[test]
    fn test_decimal_after_sign_inserts_zero() {
        let mut entry = EntryBuffer::minus();
        assert!(entry.is_sign_only());
        assert!(entry.push_decimal_point(12));
        assert_eq!(entry.as_str(), "-0.");
        assert!(!entry.is_sign_only());
    }

    #[test]
    fn test_sign_only_has_no_value() {
        assert!(EntryBuffer::minus().value().is_err());
    }

    #[test]
    fn test_invalid_digit_rejected() {
        assert!(EntryBuffer::digit(10).is_none());
        let mut entry = EntryBuffer::digit(1).unwrap();
        assert!(!entry.push_digit(42, 12));
        assert_eq!(entry.as_str(), "1");
    }

    #[test]
    fn test_echo_uses_display_format() {
        assert_eq!(EntryBuffer::echo(10.0).as_str(), "10");
        assert_eq!(EntryBuffer::echo(-0.0).as_str(), "0");
    }

    #[test]
    fn test_exponent_form_is_not_extended() {
        let mut entry = EntryBuffer::digit(2).unwrap();
        for _ in 0..4 {
            entry = entry.map_value(|v| v / 100.0).unwrap();
        }
        assert_eq!(entry.as_str(), "2e-8");
        assert!(!entry.is_extendable());
        assert!(!entry.push_digit(3, 12));
        assert!(!entry.push_decimal_point(12));
        assert_eq!(entry.value(), Ok(2e-8));
    }

    #[test]
    fn test_plain_negative_stays_extendable() {
        let mut entry = EntryBuffer::digit(5).unwrap();
        entry = entry.map_value(|v| -v).unwrap();
        assert!(entry.push_digit(3, 12));
        assert_eq!(entry.as_str(), "-53");
    }
}
