// Keypad legend
//
// Not clickable: shows which keyboard key drives each calculator button and
// highlights the pending operator.

use crate::calculator::BinaryOp;
use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyKind {
    Digit,
    Operator(BinaryOp),
    Action,
}

/// (button label, kind)
const ROWS: [[(&str, KeyKind); 4]; 5] = [
    [
        ("AC", KeyKind::Action),
        ("±", KeyKind::Action),
        ("pct", KeyKind::Action),
        ("÷", KeyKind::Operator(BinaryOp::Divide)),
    ],
    [
        ("7", KeyKind::Digit),
        ("8", KeyKind::Digit),
        ("9", KeyKind::Digit),
        ("×", KeyKind::Operator(BinaryOp::Multiply)),
    ],
    [
        ("4", KeyKind::Digit),
        ("5", KeyKind::Digit),
        ("6", KeyKind::Digit),
        ("-", KeyKind::Operator(BinaryOp::Subtract)),
    ],
    [
        ("1", KeyKind::Digit),
        ("2", KeyKind::Digit),
        ("3", KeyKind::Digit),
        ("+", KeyKind::Operator(BinaryOp::Add)),
    ],
    [
        ("0", KeyKind::Digit),
        (".", KeyKind::Digit),
        ("mod", KeyKind::Operator(BinaryOp::Modulo)),
        ("=", KeyKind::Action),
    ],
];

const CELL_WIDTH: usize = 6;

pub fn render(f: &mut Frame, area: Rect, pending: Option<BinaryOp>, theme: &Theme) {
    let mut lines: Vec<Line> = ROWS
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|(label, kind)| {
                        Span::styled(
                            format!("{:^width$}", label, width = CELL_WIDTH),
                            key_style(*kind, pending, theme),
                        )
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    // Keys that differ from the button label
    lines.push(Line::from(Span::styled(
        "Esc/c AC  n ±  p pct  % mod  x ×  / ÷  Enter =",
        Style::default().fg(theme.muted),
    )));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" Keys "),
    );
    f.render_widget(paragraph, area);
}

fn key_style(kind: KeyKind, pending: Option<BinaryOp>, theme: &Theme) -> Style {
    match kind {
        KeyKind::Digit => Style::default().fg(theme.key_digit),
        KeyKind::Action => Style::default().fg(theme.key_action),
        KeyKind::Operator(op) if pending == Some(op) => Style::default()
            .fg(theme.highlight)
            .bg(theme.selection)
            .add_modifier(Modifier::BOLD),
        KeyKind::Operator(_) => Style::default().fg(theme.key_operator),
    }
}
