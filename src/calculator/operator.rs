//! Binary operators
//!
//! The five operators a calculator key can select. Each knows its display
//! symbol (used in the expression line and in history) and how to combine
//! two operands.

use super::error::CalcError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    /// All operators, in keypad order
    pub fn all() -> &'static [BinaryOp] {
        &[
            BinaryOp::Add,
            BinaryOp::Subtract,
            BinaryOp::Multiply,
            BinaryOp::Divide,
            BinaryOp::Modulo,
        ]
    }

    /// Display symbol used in expressions: `+ - × ÷ %`
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Modulo => "%",
        }
    }

    /// Parse a display symbol or one of its ASCII aliases
    ///
    /// Accepts `+`, `-`, `×`/`*`/`x`, `÷`/`/`, `%`.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Add),
            "-" | "−" => Some(Self::Subtract),
            "×" | "*" | "x" | "X" => Some(Self::Multiply),
            "÷" | "/" => Some(Self::Divide),
            "%" => Some(Self::Modulo),
            _ => None,
        }
    }

    /// Operation kind understood by the remote history service
    pub fn remote_kind(&self) -> &'static str {
        match self {
            Self::Add => "soma",
            Self::Subtract => "subtracao",
            Self::Multiply => "multiplicacao",
            Self::Divide => "divisao",
            Self::Modulo => "modulo",
        }
    }

    /// The remote service stores the four basic operations only
    pub fn is_remote_supported(&self) -> bool {
        !matches!(self, Self::Modulo)
    }

    pub fn from_remote_kind(kind: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|op| op.remote_kind() == kind)
    }

    /// Combine two operands
    ///
    /// Division by exactly zero is an error rather than a fabricated result.
    /// Modulo uses float remainder, so `x % 0` is NaN and passes through.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(a / b)
            }
            Self::Modulo => Ok(a % b),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
