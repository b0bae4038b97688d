// Display panel
//
// Two right-aligned lines: the expression being built and the result. While
// the engine holds an error the result line reads `Error`.

use super::formatters::truncate_start;
use crate::calculator::DisplaySnapshot;
use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, snapshot: &DisplaySnapshot, theme: &Theme, focused: bool) {
    let width = area.width.saturating_sub(2) as usize;
    let (expression, result) = display_lines(snapshot, width);

    let result_style = if snapshot.error.is_some() {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.result).add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(Span::styled(expression, Style::default().fg(theme.expression))),
        Line::from(Span::styled(result, result_style)),
    ];

    let border = if focused { theme.highlight } else { theme.border };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Display ");
    if let Some(error) = &snapshot.error {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" {} ", error.label()),
                Style::default().fg(theme.error),
            ))
            .right_aligned(),
        );
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Right)
        .block(block);
    f.render_widget(paragraph, area);
}

/// Expression and result text fitted to `width` columns
pub fn display_lines(snapshot: &DisplaySnapshot, width: usize) -> (String, String) {
    let result = if snapshot.error.is_some() {
        "Error"
    } else {
        snapshot.result.as_str()
    };
    (
        truncate_start(&snapshot.expression, width),
        truncate_start(result, width),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::CalcError;

    fn snapshot(expression: &str, result: &str, error: Option<CalcError>) -> DisplaySnapshot {
        DisplaySnapshot {
            expression: expression.to_string(),
            result: result.to_string(),
            error,
        }
    }

    #[test]
    fn test_error_replaces_result() {
        let (expression, result) =
            display_lines(&snapshot("5 ÷", "0", Some(CalcError::DivisionByZero)), 20);
        assert_eq!(expression, "5 ÷");
        assert_eq!(result, "Error");
    }

    #[test]
    fn test_long_values_keep_the_tail() {
        let (expression, result) = display_lines(&snapshot("123456 + 789", "789", None), 6);
        assert_eq!(expression, "…+ 789");
        assert_eq!(result, "789");
    }
}
