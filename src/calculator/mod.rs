// Calculator module - the input/expression state machine
//
// Accepts one key press at a time and maintains the current entry, the
// pending operator and the committed operands. Evaluation is immediate and
// left to right; there is no operator precedence.
//
// Layout:
// - transition: (phase, input) → action table
// - engine: state + action execution + display snapshot
// - literal: the in-progress entry text
// - operator: binary operators and their symbols
// - format: number ↔ text boundary
// - error: calculator errors

mod engine;
mod error;
mod format;
mod literal;
mod operator;
mod transition;

pub use engine::{DisplaySnapshot, Engine, Evaluation, Outcome, DEFAULT_MAX_ENTRY_LEN};
pub use error::CalcError;
pub use format::{format_number, parse_literal};
pub use operator::BinaryOp;
pub use transition::{Input, Phase};
