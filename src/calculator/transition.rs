//! Input transition table
//!
//! Every engine input is resolved against the current phase into a single
//! `Action` before anything is mutated. The table is one exhaustive match so
//! each (phase, input) pair can be read and tested on its own.
//!
//! ```text
//!              digit        .            ±/%          op             =
//! Empty        start        start "0."   ignore       "-" → sign     ignore
//! Sign         append       append       ignore       ignore         ignore
//! Entering     append       append       transform    commit         ignore
//! Operator     start        start "0."   ignore       replace op     ignore
//! OpEntering   append       append       transform    chain          evaluate
//! Result       start fresh  start fresh  transform    continue       ignore
//! ```
//!
//! Clear resets from every phase.

use super::operator::BinaryOp;

/// A single calculator key press, already decoded from raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Digit(u8),
    DecimalPoint,
    Negate,
    Percent,
    Operator(BinaryOp),
    Equals,
    Clear,
}

/// Engine phase, derived from (current entry, pending operator, operands)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing entered
    Empty,
    /// A lone leading minus sign, no operands yet
    Sign,
    /// Typing the first operand
    Entering,
    /// Operator pending, waiting for the right-hand operand
    Operator,
    /// Operator pending, right-hand operand being typed
    OperatorEntering,
    /// Showing the result of the last evaluation
    Result,
}

/// Unary transforms applied to a value in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Negate,
    Percent,
}

impl Transform {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Negate => value * -1.0,
            Self::Percent => value / 100.0,
        }
    }
}

/// How a new entry begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    Digit(u8),
    DecimalPoint,
    Minus,
}

/// What the engine does in response to an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Silently ignored, no state change
    Ignore,
    /// Begin a new entry; drops a finished result when no operator is pending
    Start(Seed),
    AppendDigit(u8),
    AppendDecimalPoint,
    /// Transform the in-progress entry
    TransformEntry(Transform),
    /// Transform the displayed result and the operand it came from
    TransformResult(Transform),
    /// Push the entry as the left operand and select the operator
    Commit(BinaryOp),
    /// Swap the pending operator for another
    ReplaceOperator(BinaryOp),
    /// Evaluate the pending operation, then select the new operator
    Chain(BinaryOp),
    /// Use the displayed result as the left operand
    Continue(BinaryOp),
    /// Evaluate the pending operation (equals)
    Evaluate,
    Reset,
}

/// Resolve an input against a phase
pub fn transition(phase: Phase, input: Input) -> Action {
    use Action::*;

    match (phase, input) {
        (_, Input::Clear) => Reset,

        (Phase::Empty, Input::Digit(d)) => Start(Seed::Digit(d)),
        (Phase::Empty, Input::DecimalPoint) => Start(Seed::DecimalPoint),
        (Phase::Empty, Input::Operator(BinaryOp::Subtract)) => Start(Seed::Minus),
        (Phase::Empty, Input::Operator(_)) => Ignore,
        (Phase::Empty, Input::Negate | Input::Percent | Input::Equals) => Ignore,

        (Phase::Sign, Input::Digit(d)) => AppendDigit(d),
        (Phase::Sign, Input::DecimalPoint) => AppendDecimalPoint,
        (Phase::Sign, Input::Negate | Input::Percent | Input::Operator(_) | Input::Equals) => {
            Ignore
        }

        (Phase::Entering, Input::Digit(d)) => AppendDigit(d),
        (Phase::Entering, Input::DecimalPoint) => AppendDecimalPoint,
        (Phase::Entering, Input::Negate) => TransformEntry(Transform::Negate),
        (Phase::Entering, Input::Percent) => TransformEntry(Transform::Percent),
        (Phase::Entering, Input::Operator(op)) => Commit(op),
        (Phase::Entering, Input::Equals) => Ignore,

        (Phase::Operator, Input::Digit(d)) => Start(Seed::Digit(d)),
        (Phase::Operator, Input::DecimalPoint) => Start(Seed::DecimalPoint),
        (Phase::Operator, Input::Operator(op)) => ReplaceOperator(op),
        (Phase::Operator, Input::Negate | Input::Percent | Input::Equals) => Ignore,

        (Phase::OperatorEntering, Input::Digit(d)) => AppendDigit(d),
        (Phase::OperatorEntering, Input::DecimalPoint) => AppendDecimalPoint,
        (Phase::OperatorEntering, Input::Negate) => TransformEntry(Transform::Negate),
        (Phase::OperatorEntering, Input::Percent) => TransformEntry(Transform::Percent),
        (Phase::OperatorEntering, Input::Operator(op)) => Chain(op),
        (Phase::OperatorEntering, Input::Equals) => Evaluate,

        (Phase::Result, Input::Digit(d)) => Start(Seed::Digit(d)),
        (Phase::Result, Input::DecimalPoint) => Start(Seed::DecimalPoint),
        (Phase::Result, Input::Negate) => TransformResult(Transform::Negate),
        (Phase::Result, Input::Percent) => TransformResult(Transform::Percent),
        (Phase::Result, Input::Operator(op)) => Continue(op),
        (Phase::Result, Input::Equals) => Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [Phase; 6] = [
        Phase::Empty,
        Phase::Sign,
        Phase::Entering,
        Phase::Operator,
        Phase::OperatorEntering,
        Phase::Result,
    ];

    #[test]
    fn test_clear_resets_from_every_phase() {
        for phase in ALL_PHASES {
            assert_eq!(transition(phase, Input::Clear), Action::Reset);
        }
    }

    #[test]
    fn test_empty_only_accepts_minus_operator() {
        assert_eq!(
            transition(Phase::Empty, Input::Operator(BinaryOp::Subtract)),
            Action::Start(Seed::Minus)
        );
        for op in [
            BinaryOp::Add,
            BinaryOp::Multiply,
            BinaryOp::Divide,
            BinaryOp::Modulo,
        ] {
            assert_eq!(
                transition(Phase::Empty, Input::Operator(op)),
                Action::Ignore
            );
        }
    }

    #[test]
    fn test_equals_only_evaluates_with_pending_entry() {
        for phase in ALL_PHASES {
            let expected = if phase == Phase::OperatorEntering {
                Action::Evaluate
            } else {
                Action::Ignore
            };
            assert_eq!(transition(phase, Input::Equals), expected, "{:?}", phase);
        }
    }

    #[test]
    fn test_operator_press_per_phase() {
        let op = Input::Operator(BinaryOp::Add);
        assert_eq!(transition(Phase::Sign, op), Action::Ignore);
        assert_eq!(
            transition(Phase::Entering, op),
            Action::Commit(BinaryOp::Add)
        );
        assert_eq!(
            transition(Phase::Operator, op),
            Action::ReplaceOperator(BinaryOp::Add)
        );
        assert_eq!(
            transition(Phase::OperatorEntering, op),
            Action::Chain(BinaryOp::Add)
        );
        assert_eq!(
            transition(Phase::Result, op),
            Action::Continue(BinaryOp::Add)
        );
    }

    #[test]
    fn test_unary_keys_need_a_value() {
        for phase in [Phase::Empty, Phase::Sign, Phase::Operator] {
            assert_eq!(transition(phase, Input::Negate), Action::Ignore);
            assert_eq!(transition(phase, Input::Percent), Action::Ignore);
        }
        assert_eq!(
            transition(Phase::Result, Input::Percent),
            Action::TransformResult(Transform::Percent)
        );
    }

    #[test]
    fn test_transforms() {
        assert_eq!(Transform::Negate.apply(4.0), -4.0);
        assert_eq!(Transform::Percent.apply(50.0), 0.5);
    }
}
