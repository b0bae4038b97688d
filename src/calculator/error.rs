//! Calculator error types
//!
//! Ignored input (an operator with nothing to apply it to, equals without a
//! pending operation) is not an error: it is reported as `Outcome::Ignored`.
//! Everything here is recoverable by clearing the engine.

use std::fmt;

/// Errors raised by an engine operation
///
/// When an operation returns one of these, the engine state is exactly what
/// it was before the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// Divide with a divisor of exactly zero
    DivisionByZero,
    /// The entry buffer could not be parsed as a number
    MalformedLiteral(String),
}

impl CalcError {
    /// Short text for the result line and toasts
    pub fn label(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "Division by zero",
            Self::MalformedLiteral(_) => "Invalid number",
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "Division by zero"),
            Self::MalformedLiteral(text) => write!(f, "Malformed numeric literal: {:?}", text),
        }
    }
}

impl std::error::Error for CalcError {}
