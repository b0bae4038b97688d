// History panel
//
// Completed calculations, newest first. Entries stored remotely carry a
// filled marker. Selection is only drawn while the panel has focus.

use super::formatters::truncate_end;
use crate::calculator::format_number;
use crate::history::{History, HistoryEntry};
use crate::theme::Theme;
use crate::tui::layout::Breakpoint;
use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub struct HistoryView<'a> {
    pub history: &'a History,
    pub selected: Option<usize>,
    pub visible_entries: usize,
    pub focused: bool,
}

pub fn render(f: &mut Frame, area: Rect, view: HistoryView<'_>, theme: &Theme) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let rows = (area.height.saturating_sub(2) as usize).min(view.visible_entries);
    let show_time = Breakpoint::from_width(area.width).at_least(Breakpoint::Normal);
    let (start, end) = visible_window(view.history.len(), view.selected, rows);

    let items: Vec<ListItem> = view
        .history
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(idx, entry)| {
            let text = truncate_end(&format_entry(entry, show_time), inner_width);
            let style = if view.focused && view.selected == Some(idx) {
                Style::default()
                    .fg(theme.highlight)
                    .bg(theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.result)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let border = if view.focused {
        theme.highlight
    } else {
        theme.border
    };
    let title = format!(" History ({}) ", view.history.len());
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    if view.focused {
        block = block.title_bottom(
            Line::from(" ↵ recall  d delete  D clear ")
                .style(Style::default().fg(theme.muted))
                .right_aligned(),
        );
    }

    if items.is_empty() {
        let empty = List::new(vec![ListItem::new("No calculations yet")
            .style(Style::default().fg(theme.muted))])
        .block(block);
        f.render_widget(empty, area);
    } else {
        f.render_widget(List::new(items).block(block), area);
    }
}

/// One history row: `● 8 + 2 = 10` plus local time when there is room
pub fn format_entry(entry: &HistoryEntry, show_time: bool) -> String {
    let marker = if entry.is_remote() { '●' } else { '○' };
    let line = format!(
        "{} {} = {}",
        marker,
        entry.expression,
        format_number(entry.result)
    );
    if show_time {
        format!(
            "{}  {}",
            entry.timestamp.with_timezone(&Local).format("%H:%M"),
            line
        )
    } else {
        line
    }
}

/// Range of rows to draw so that `selected` stays visible
pub fn visible_window(len: usize, selected: Option<usize>, rows: usize) -> (usize, usize) {
    if len == 0 || rows == 0 {
        return (0, 0);
    }
    let start = match selected {
        Some(idx) if idx >= rows => idx + 1 - rows,
        _ => 0,
    };
    (start, (start + rows).min(len))
}
