// Key mapping - raw input to calculator inputs
//
// Two sources feed the calculator: terminal key codes in the TUI and
// whitespace-separated tokens for `kogui eval` / headless stdin. Both are
// decoded here so the engine only ever sees typed `Input`s.

use crate::calculator::{BinaryOp, Input};
use crossterm::event::KeyCode;
use std::fmt;

/// Calculator input for a terminal key, if it is one
///
/// Enter is not mapped: it means equals or recall depending on focus.
pub fn calculator_input(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Char(c) => char_input(c),
        KeyCode::Esc => Some(Input::Clear),
        _ => None,
    }
}

fn char_input(c: char) -> Option<Input> {
    match c {
        '0'..='9' => c.to_digit(10).map(|d| Input::Digit(d as u8)),
        '.' | ',' => Some(Input::DecimalPoint),
        '=' => Some(Input::Equals),
        'c' | 'C' => Some(Input::Clear),
        'n' | '±' => Some(Input::Negate),
        'p' => Some(Input::Percent),
        _ => {
            let mut buf = [0u8; 4];
            BinaryOp::from_symbol(c.encode_utf8(&mut buf)).map(Input::Operator)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    UnknownToken(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownToken(token) => write!(f, "Unknown token: {:?}", token),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Decode a calculator script into inputs
///
/// Tokens are separated by whitespace. Numbers may be grouped (`12.5`) and
/// a number token with a leading minus (`-3`) is entered then negated, so
/// `5 - -3 =` means five minus negative three. Operators and number digits
/// may also be packed together (`5+3=`).
pub fn parse_script(script: &str) -> Result<Vec<Input>, ScriptError> {
    let mut inputs = Vec::new();
    for token in script.split_whitespace() {
        parse_token(token, &mut inputs)?;
    }
    Ok(inputs)
}

fn parse_token(token: &str, inputs: &mut Vec<Input>) -> Result<(), ScriptError> {
    match token.to_ascii_lowercase().as_str() {
        "clear" | "ac" => {
            inputs.push(Input::Clear);
            return Ok(());
        }
        "neg" => {
            inputs.push(Input::Negate);
            return Ok(());
        }
        "pct" => {
            inputs.push(Input::Percent);
            return Ok(());
        }
        _ => {}
    }

    if let Some(number) = token.strip_prefix('-') {
        if is_number(number) {
            push_number(number, inputs);
            inputs.push(Input::Negate);
            return Ok(());
        }
    }

    for c in token.chars() {
        let input = char_input(c).ok_or_else(|| ScriptError::UnknownToken(token.to_string()))?;
        inputs.push(input);
    }
    Ok(())
}

fn is_number(s: &str) -> bool {
    !s.is_empty()
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

fn push_number(number: &str, inputs: &mut Vec<Input>) {
    inputs.extend(number.chars().filter_map(char_input));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_keys() {
        assert_eq!(calculator_input(KeyCode::Char('7')), Some(Input::Digit(7)));
        assert_eq!(
            calculator_input(KeyCode::Char(',')),
            Some(Input::DecimalPoint)
        );
        assert_eq!(
            calculator_input(KeyCode::Char('x')),
            Some(Input::Operator(BinaryOp::Multiply))
        );
        assert_eq!(
            calculator_input(KeyCode::Char('/')),
            Some(Input::Operator(BinaryOp::Divide))
        );
        assert_eq!(
            calculator_input(KeyCode::Char('%')),
            Some(Input::Operator(BinaryOp::Modulo))
        );
        assert_eq!(calculator_input(KeyCode::Esc), Some(Input::Clear));
        assert_eq!(calculator_input(KeyCode::Enter), None);
        assert_eq!(calculator_input(KeyCode::Char('q')), None);
    }

    #[test]
    fn test_grouped_numbers() {
        assert_eq!(
            parse_script("12.5 * 2 =").unwrap(),
            vec![
                Input::Digit(1),
                Input::Digit(2),
                Input::DecimalPoint,
                Input::Digit(5),
                Input::Operator(BinaryOp::Multiply),
                Input::Digit(2),
                Input::Equals,
            ]
        );
    }

    #[test]
    fn test_negative_number_token() {
        assert_eq!(
            parse_script("5 - -3").unwrap(),
            vec![
                Input::Digit(5),
                Input::Operator(BinaryOp::Subtract),
                Input::Digit(3),
                Input::Negate,
            ]
        );
    }

    #[test]
    fn test_packed_and_word_tokens() {
        assert_eq!(
            parse_script("7%3= neg PCT clear").unwrap(),
            vec![
                Input::Digit(7),
                Input::Operator(BinaryOp::Modulo),
                Input::Digit(3),
                Input::Equals,
                Input::Negate,
                Input::Percent,
                Input::Clear,
            ]
        );
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(
            parse_script("2 ^ 3"),
            Err(ScriptError::UnknownToken("^".to_string()))
        );
    }
}
