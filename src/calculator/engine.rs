//! Calculator engine
//!
//! Owns the calculator state and applies inputs one at a time. Every public
//! operation runs to completion and leaves the state settled before it
//! returns, so an observer reading `display()` afterwards always sees a
//! consistent picture.
//!
//! Evaluation is immediate and left to right: pressing an operator while a
//! previous operation is ready evaluates it first (`5 + 3 + 2 =` is `10`).
//! Outside an evaluation step the operand stack holds at most one value.

use super::error::CalcError;
use super::format::format_number;
use super::literal::EntryBuffer;
use super::operator::BinaryOp;
use super::transition::{transition, Action, Input, Phase, Seed};

/// Default character limit for the entry buffer
pub const DEFAULT_MAX_ENTRY_LEN: usize = 12;

/// A completed binary step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub lhs: f64,
    pub op: BinaryOp,
    pub rhs: f64,
    pub result: f64,
}

impl Evaluation {
    /// `"A op B"` form used for history
    ///
    /// Covers the final binary step only. For a chain like `5 + 3 + 2 =` this
    /// is `"8 + 2"`.
    pub fn expression(&self) -> String {
        format!(
            "{} {} {}",
            format_number(self.lhs),
            self.op.symbol(),
            format_number(self.rhs)
        )
    }
}

/// Result of applying an input
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// State changed
    Updated,
    /// Input not applicable in the current state; nothing changed
    Ignored,
    /// Equals produced a result
    Evaluated(Evaluation),
}

/// What the display renderer needs after each input
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    /// Committed operands, pending operator and in-progress entry
    pub expression: String,
    /// Current entry, else last operand, else `"0"`
    pub result: String,
    /// Set while the last failed operation has not been superseded
    pub error: Option<CalcError>,
}

#[derive(Debug, Clone)]
pub struct Engine {
    current: Option<EntryBuffer>,
    operator: Option<BinaryOp>,
    operands: Vec<f64>,
    last_error: Option<CalcError>,
    max_entry_len: usize,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_max_entry_len(DEFAULT_MAX_ENTRY_LEN)
    }

    pub fn with_max_entry_len(max_entry_len: usize) -> Self {
        Self {
            current: None,
            operator: None,
            operands: Vec::new(),
            last_error: None,
            max_entry_len: max_entry_len.max(1),
        }
    }

    /// Apply one input
    ///
    /// On error the state is unchanged apart from the error flag.
    pub fn apply(&mut self, input: Input) -> Result<Outcome, CalcError> {
        let phase = self.phase();
        let action = transition(phase, input);
        tracing::trace!(?phase, ?input, ?action, "calculator transition");

        match self.execute(action) {
            Ok(Outcome::Ignored) => Ok(Outcome::Ignored),
            Ok(outcome) => {
                self.last_error = None;
                Ok(outcome)
            }
            Err(e) => {
                tracing::debug!(error = %e, ?phase, ?input, "calculator input rejected");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Load an `"A op B"` history expression back into the engine
    ///
    /// Leaves operand `A`, operator `op` pending and `B` as the entry, so
    /// equals re-evaluates it. Unparsable expressions are ignored.
    pub fn recall(&mut self, expression: &str) -> Outcome {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        let [lhs, op, rhs] = parts.as_slice() else {
            return Outcome::Ignored;
        };
        let (Ok(lhs), Some(op)) = (super::format::parse_literal(lhs), BinaryOp::from_symbol(op))
        else {
            return Outcome::Ignored;
        };
        let entry = EntryBuffer::typed(*rhs);
        if entry.value().is_err() {
            return Outcome::Ignored;
        }

        self.operands = vec![lhs];
        self.operator = Some(op);
        self.current = Some(entry);
        self.last_error = None;
        Outcome::Updated
    }

    // ─────────────────────────────────────────────────────────────────────
    // State inspection
    // ─────────────────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        match (&self.current, self.operator, self.operands.is_empty()) {
            (None, Some(_), _) => Phase::Operator,
            (Some(_), Some(_), _) => Phase::OperatorEntering,
            (None, None, true) => Phase::Empty,
            (Some(entry), None, true) if entry.is_sign_only() => Phase::Sign,
            (Some(_), None, true) => Phase::Entering,
            (_, None, false) => Phase::Result,
        }
    }

    pub fn pending_operator(&self) -> Option<BinaryOp> {
        self.operator
    }

    pub fn display(&self) -> DisplaySnapshot {
        let expression = if self.phase() == Phase::Result {
            String::new()
        } else {
            let mut parts: Vec<String> = self.operands.iter().map(|v| format_number(*v)).collect();
            if let Some(op) = self.operator {
                parts.push(op.symbol().to_string());
            }
            if let Some(entry) = &self.current {
                parts.push(entry.as_str().to_string());
            }
            parts.join(" ")
        };

        let result = match &self.current {
            Some(entry) => entry.as_str().to_string(),
            None => self
                .operands
                .last()
                .map(|v| format_number(*v))
                .unwrap_or_else(|| "0".to_string()),
        };

        DisplaySnapshot {
            expression,
            result,
            error: self.last_error.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Action execution
    // ─────────────────────────────────────────────────────────────────────

    fn execute(&mut self, action: Action) -> Result<Outcome, CalcError> {
        match action {
            Action::Ignore => Ok(Outcome::Ignored),

            Action::Start(seed) => {
                let entry = match seed {
                    Seed::Digit(d) => match EntryBuffer::digit(d) {
                        Some(entry) => entry,
                        None => return Ok(Outcome::Ignored),
                    },
                    Seed::DecimalPoint => EntryBuffer::decimal(),
                    Seed::Minus => EntryBuffer::minus(),
                };
                // Typing after a finished result starts a new calculation
                if self.operator.is_none() {
                    self.operands.clear();
                }
                self.current = Some(entry);
                Ok(Outcome::Updated)
            }

            Action::AppendDigit(d) => {
                let limit = self.max_entry_len;
                let appended = match self.current.as_mut() {
                    Some(entry) => entry.push_digit(d, limit),
                    None => false,
                };
                Ok(if appended {
                    Outcome::Updated
                } else {
                    Outcome::Ignored
                })
            }

            Action::AppendDecimalPoint => {
                let limit = self.max_entry_len;
                let appended = match self.current.as_mut() {
                    Some(entry) => entry.push_decimal_point(limit),
                    None => false,
                };
                Ok(if appended {
                    Outcome::Updated
                } else {
                    Outcome::Ignored
                })
            }

            Action::TransformEntry(transform) => {
                let Some(entry) = &self.current else {
                    return Ok(Outcome::Ignored);
                };
                let next = entry.map_value(|v| transform.apply(v))?;
                self.current = Some(next);
                Ok(Outcome::Updated)
            }

            Action::TransformResult(transform) => {
                let Some(top) = self.operands.last_mut() else {
                    return Ok(Outcome::Ignored);
                };
                *top = transform.apply(*top);
                self.current = Some(EntryBuffer::echo(*top));
                Ok(Outcome::Updated)
            }

            Action::Commit(op) => {
                let value = self.entry_value()?;
                self.operands.push(value);
                self.operator = Some(op);
                self.current = None;
                Ok(Outcome::Updated)
            }

            Action::ReplaceOperator(op) => {
                self.operator = Some(op);
                Ok(Outcome::Updated)
            }

            Action::Chain(next_op) => {
                let Some(step) = self.pending_step()? else {
                    return Ok(Outcome::Ignored);
                };
                tracing::trace!(expression = %step.expression(), result = step.result, "chained evaluation");
                self.collapse(step.result);
                self.operator = Some(next_op);
                self.current = None;
                Ok(Outcome::Updated)
            }

            Action::Continue(op) => {
                // A result entry always echoes the top operand
                self.operator = Some(op);
                self.current = None;
                Ok(Outcome::Updated)
            }

            Action::Evaluate => {
                let Some(step) = self.pending_step()? else {
                    return Ok(Outcome::Ignored);
                };
                self.collapse(step.result);
                self.operator = None;
                self.current = Some(EntryBuffer::echo(step.result));
                Ok(Outcome::Evaluated(step))
            }

            Action::Reset => {
                self.reset();
                Ok(Outcome::Updated)
            }
        }
    }

    /// Compute the pending operation without touching state
    fn pending_step(&self) -> Result<Option<Evaluation>, CalcError> {
        let (Some(op), Some(lhs)) = (self.operator, self.operands.last().copied()) else {
            return Ok(None);
        };
        let rhs = self.entry_value()?;
        let result = op.apply(lhs, rhs)?;
        Ok(Some(Evaluation {
            lhs,
            op,
            rhs,
            result,
        }))
    }

    fn entry_value(&self) -> Result<f64, CalcError> {
        match &self.current {
            Some(entry) => entry.value(),
            None => Err(CalcError::MalformedLiteral(String::new())),
        }
    }

    /// Replace the left operand of the step just evaluated with its result
    fn collapse(&mut self, result: f64) {
        self.operands.pop();
        self.operands.push(result);
    }

    fn reset(&mut self) {
        self.current = None;
        self.operator = None;
        self.operands.clear();
        self.last_error = None;
    }
}

/// One method per calculator key, plus state inspection
#[allow(dead_code)] // Key-at-a-time API; the UI and scripts go through `apply`
impl Engine {
    pub fn digit(&mut self, d: u8) -> Result<Outcome, CalcError> {
        self.apply(Input::Digit(d))
    }

    pub fn decimal_point(&mut self) -> Result<Outcome, CalcError> {
        self.apply(Input::DecimalPoint)
    }

    pub fn negate(&mut self) -> Result<Outcome, CalcError> {
        self.apply(Input::Negate)
    }

    pub fn percent(&mut self) -> Result<Outcome, CalcError> {
        self.apply(Input::Percent)
    }

    pub fn operator(&mut self, op: BinaryOp) -> Result<Outcome, CalcError> {
        self.apply(Input::Operator(op))
    }

    pub fn equals(&mut self) -> Result<Outcome, CalcError> {
        self.apply(Input::Equals)
    }

    /// Reset to the empty state, dropping any error
    pub fn clear(&mut self) {
        self.reset();
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|e| e.as_str())
    }

    pub fn operands(&self) -> &[f64] {
        &self.operands
    }

    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.operator.is_none() && self.operands.is_empty()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed a script like `"5 + 3 + 2 ="` one key at a time
    fn run(engine: &mut Engine, script: &str) -> Vec<Result<Outcome, CalcError>> {
        script
            .split_whitespace()
            .flat_map(|token| {
                let inputs: Vec<Input> = match token {
                    "=" => vec![Input::Equals],
                    "C" => vec![Input::Clear],
                    "±" => vec![Input::Negate],
                    "pct" => vec![Input::Percent],
                    "." => vec![Input::DecimalPoint],
                    other => match BinaryOp::from_symbol(other) {
                        Some(op) => vec![Input::Operator(op)],
                        None => other
                            .chars()
                            .map(|c| match c {
                                '.' => Input::DecimalPoint,
                                c => Input::Digit(c.to_digit(10).unwrap() as u8),
                            })
                            .collect(),
                    },
                };
                inputs
            })
            .map(|input| engine.apply(input))
            .collect()
    }

    fn last_evaluation(outcomes: &[Result<Outcome, CalcError>]) -> Option<Evaluation> {
        outcomes.iter().rev().find_map(|o| match o {
            Ok(Outcome::Evaluated(ev)) => Some(*ev),
            _ => None,
        })
    }

    #[test]
    fn test_digits_concatenate() {
        let mut engine = Engine::new();
        run(&mut engine, "1 0 2 4");
        assert_eq!(engine.current(), Some("1024"));
        assert!(engine.operands().is_empty());
        assert_eq!(engine.pending_operator(), None);
    }

    #[test]
    fn test_entry_length_limit() {
        let mut engine = Engine::new();
        run(&mut engine, "123456789012");
        assert_eq!(engine.digit(3), Ok(Outcome::Ignored));
        assert_eq!(engine.current(), Some("123456789012"));
    }

    #[test]
    fn test_decimal_point_is_idempotent() {
        let mut engine = Engine::new();
        engine.decimal_point().unwrap();
        assert_eq!(engine.current(), Some("0."));
        assert_eq!(engine.decimal_point(), Ok(Outcome::Ignored));
        run(&mut engine, "5");
        assert_eq!(engine.decimal_point(), Ok(Outcome::Ignored));
        assert_eq!(engine.current(), Some("0.5"));
    }

    #[test]
    fn test_negate_twice_restores_value() {
        let mut engine = Engine::new();
        run(&mut engine, "12.5");
        engine.negate().unwrap();
        assert_eq!(engine.current(), Some("-12.5"));
        engine.negate().unwrap();
        assert_eq!(engine.current(), Some("12.5"));
    }

    #[test]
    fn test_negate_and_percent_without_entry_are_ignored() {
        let mut engine = Engine::new();
        assert_eq!(engine.negate(), Ok(Outcome::Ignored));
        assert_eq!(engine.percent(), Ok(Outcome::Ignored));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_percent_divides_by_hundred() {
        let mut engine = Engine::new();
        run(&mut engine, "50");
        engine.percent().unwrap();
        assert_eq!(engine.current(), Some("0.5"));
    }

    #[test]
    fn test_chained_operations_evaluate_left_to_right() {
        let mut engine = Engine::new();
        let outcomes = run(&mut engine, "5 + 3 + 2 =");
        let ev = last_evaluation(&outcomes).expect("equals should evaluate");
        assert_eq!(ev.result, 10.0);
        assert_eq!(engine.current(), Some("10"));
        assert_eq!(engine.operands(), &[10.0]);
        assert_eq!(engine.pending_operator(), None);
    }

    #[test]
    fn test_chain_evaluates_on_operator_press() {
        let mut engine = Engine::new();
        run(&mut engine, "5 + 3 ×");
        assert_eq!(engine.operands(), &[8.0]);
        assert_eq!(engine.pending_operator(), Some(BinaryOp::Multiply));
        assert_eq!(engine.current(), None);
        assert_eq!(engine.display().result, "8");
        let outcomes = run(&mut engine, "2 =");
        assert_eq!(last_evaluation(&outcomes).unwrap().result, 16.0);
    }

    #[test]
    fn test_history_expression_is_last_step_only() {
        let mut engine = Engine::new();
        let outcomes = run(&mut engine, "5 + 3 + 2 =");
        assert_eq!(last_evaluation(&outcomes).unwrap().expression(), "8 + 2");
    }

    #[test]
    fn test_repeated_value_is_still_an_operand() {
        let mut engine = Engine::new();
        run(&mut engine, "5 + 5 +");
        assert_eq!(engine.operands(), &[10.0]);
        let outcomes = run(&mut engine, "2 =");
        assert_eq!(last_evaluation(&outcomes).unwrap().result, 12.0);
    }

    #[test]
    fn test_exponent_entry_ignores_digits_and_point() {
        let mut engine = Engine::new();
        run(&mut engine, "2 pct pct pct pct");
        assert_eq!(engine.current(), Some("2e-8"));

        let outcomes = run(&mut engine, ". 3");
        assert_eq!(outcomes, vec![Ok(Outcome::Ignored), Ok(Outcome::Ignored)]);
        assert_eq!(engine.current(), Some("2e-8"));

        assert_eq!(engine.operator(BinaryOp::Add), Ok(Outcome::Updated));
        assert_eq!(engine.operands(), &[2e-8]);
        assert_eq!(engine.last_error(), None);
    }

    #[test]
    fn test_exponent_entry_as_right_operand() {
        let mut engine = Engine::new();
        run(&mut engine, "1 + 2 pct pct pct pct 3");
        assert_eq!(engine.current(), Some("2e-8"));
        let outcomes = run(&mut engine, "=");
        assert_eq!(last_evaluation(&outcomes).unwrap().rhs, 2e-8);
    }

    #[test]
    fn test_repeated_operator_press_replaces_operator() {
        let mut engine = Engine::new();
        run(&mut engine, "9 + + -");
        assert_eq!(engine.operands(), &[9.0]);
        assert_eq!(engine.pending_operator(), Some(BinaryOp::Subtract));
        let outcomes = run(&mut engine, "4 =");
        assert_eq!(last_evaluation(&outcomes).unwrap().result, 5.0);
    }

    #[test]
    fn test_modulo_operator() {
        let mut engine = Engine::new();
        let outcomes = run(&mut engine, "7 % 3 =");
        assert_eq!(last_evaluation(&outcomes).unwrap().result, 1.0);
    }

    #[test]
    fn test_division_by_zero_leaves_state_unchanged() {
        let mut engine = Engine::new();
        run(&mut engine, "5 ÷ 0");
        let before = (
            engine.current().map(str::to_string),
            engine.pending_operator(),
            engine.operands().to_vec(),
        );

        assert_eq!(engine.equals(), Err(CalcError::DivisionByZero));
        assert_eq!(engine.last_error(), Some(&CalcError::DivisionByZero));
        assert_eq!(
            before,
            (
                engine.current().map(str::to_string),
                engine.pending_operator(),
                engine.operands().to_vec(),
            )
        );
        assert_eq!(engine.display().error, Some(CalcError::DivisionByZero));

        engine.clear();
        assert!(engine.is_empty());
        assert_eq!(engine.last_error(), None);
    }

    #[test]
    fn test_division_by_zero_in_chain() {
        let mut engine = Engine::new();
        run(&mut engine, "8 ÷ 0");
        assert_eq!(
            engine.operator(BinaryOp::Add),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(engine.pending_operator(), Some(BinaryOp::Divide));
        assert_eq!(engine.current(), Some("0"));

        // Fixing the divisor recovers without clearing
        engine.apply(Input::Digit(2)).unwrap();
        let outcomes = run(&mut engine, "=");
        assert_eq!(last_evaluation(&outcomes).unwrap().result, 4.0);
        assert_eq!(engine.last_error(), None);
    }

    #[test]
    fn test_modulo_by_zero_passes_nan_through() {
        let mut engine = Engine::new();
        let outcomes = run(&mut engine, "5 % 0 =");
        assert!(last_evaluation(&outcomes).unwrap().result.is_nan());
        assert_eq!(engine.display().result, "NaN");
        assert_eq!(engine.last_error(), None);
    }

    #[test]
    fn test_leading_negative_literal() {
        let mut engine = Engine::new();
        engine.operator(BinaryOp::Subtract).unwrap();
        assert_eq!(engine.phase(), Phase::Sign);
        assert_eq!(engine.current(), Some("-"));

        // Operators and equals wait for digits
        assert_eq!(engine.operator(BinaryOp::Add), Ok(Outcome::Ignored));
        assert_eq!(engine.equals(), Ok(Outcome::Ignored));

        let outcomes = run(&mut engine, "4 + 10 =");
        assert_eq!(last_evaluation(&outcomes).unwrap().result, 6.0);
    }

    #[test]
    fn test_operator_on_empty_is_ignored() {
        let mut engine = Engine::new();
        for op in [BinaryOp::Add, BinaryOp::Multiply, BinaryOp::Divide] {
            assert_eq!(engine.operator(op), Ok(Outcome::Ignored));
        }
        assert!(engine.is_empty());
    }

    #[test]
    fn test_equals_needs_operator_and_entry() {
        let mut engine = Engine::new();
        assert_eq!(engine.equals(), Ok(Outcome::Ignored));
        run(&mut engine, "5");
        assert_eq!(engine.equals(), Ok(Outcome::Ignored));
        run(&mut engine, "+");
        assert_eq!(engine.equals(), Ok(Outcome::Ignored));
        assert_eq!(engine.operands(), &[5.0]);
    }

    #[test]
    fn test_result_continues_with_operator() {
        let mut engine = Engine::new();
        run(&mut engine, "2 × 3 =");
        let outcomes = run(&mut engine, "+ 4 =");
        let ev = last_evaluation(&outcomes).unwrap();
        assert_eq!(ev.expression(), "6 + 4");
        assert_eq!(ev.result, 10.0);
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let mut engine = Engine::new();
        run(&mut engine, "2 × 3 =");
        run(&mut engine, "7");
        assert_eq!(engine.current(), Some("7"));
        assert!(engine.operands().is_empty());
        assert_eq!(engine.phase(), Phase::Entering);
    }

    #[test]
    fn test_negate_result_updates_operand() {
        let mut engine = Engine::new();
        run(&mut engine, "2 + 3 =");
        engine.negate().unwrap();
        assert_eq!(engine.current(), Some("-5"));
        assert_eq!(engine.operands(), &[-5.0]);
        let outcomes = run(&mut engine, "× 2 =");
        assert_eq!(last_evaluation(&outcomes).unwrap().result, -10.0);
    }

    #[test]
    fn test_display_lines() {
        let mut engine = Engine::new();
        assert_eq!(engine.display().result, "0");
        assert_eq!(engine.display().expression, "");

        run(&mut engine, "12 +");
        let display = engine.display();
        assert_eq!(display.expression, "12 +");
        assert_eq!(display.result, "12");

        run(&mut engine, "3");
        let display = engine.display();
        assert_eq!(display.expression, "12 + 3");
        assert_eq!(display.result, "3");

        run(&mut engine, "=");
        let display = engine.display();
        assert_eq!(display.expression, "");
        assert_eq!(display.result, "15");
    }

    #[test]
    fn test_clear_from_any_state() {
        let scripts = ["", "7", "7 +", "7 + 2", "7 + 2 =", "5 ÷ 0 ="];
        for script in scripts {
            let mut engine = Engine::new();
            run(&mut engine, script);
            engine.clear();
            assert!(engine.is_empty(), "not empty after {:?}", script);
            assert_eq!(engine.phase(), Phase::Empty);
        }

        let mut engine = Engine::new();
        engine.operator(BinaryOp::Subtract).unwrap();
        assert_eq!(engine.apply(Input::Clear), Ok(Outcome::Updated));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_recall_history_expression() {
        let mut engine = Engine::new();
        assert_eq!(engine.recall("6 × -2"), Outcome::Updated);
        assert_eq!(engine.operands(), &[6.0]);
        assert_eq!(engine.pending_operator(), Some(BinaryOp::Multiply));
        assert_eq!(engine.current(), Some("-2"));
        let outcomes = run(&mut engine, "=");
        assert_eq!(last_evaluation(&outcomes).unwrap().result, -12.0);

        assert_eq!(engine.recall("6 × "), Outcome::Ignored);
        assert_eq!(engine.recall("six × 2"), Outcome::Ignored);
        assert_eq!(engine.recall("1 ^ 2"), Outcome::Ignored);
        assert_eq!(engine.current(), Some("-12"));
    }

    #[test]
    fn test_independent_engines() {
        let mut a = Engine::new();
        let mut b = Engine::new();
        run(&mut a, "1 +");
        run(&mut b, "9");
        assert_eq!(a.operands(), &[1.0]);
        assert_eq!(b.current(), Some("9"));
        assert!(b.operands().is_empty());
    }
}
