// Logs panel
//
// The most recent tracing events captured by `TuiLogLayer`, oldest at the top.

use super::formatters::truncate_end;
use crate::logging::{LogBuffer, LogEntry, LogLevel};
use crate::theme::Theme;
use chrono::Local;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, buffer: &LogBuffer, theme: &Theme) {
    let rows = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = buffer
        .recent(rows)
        .iter()
        .map(|entry| {
            ListItem::new(truncate_end(&format_log_entry(entry), width))
                .style(log_level_style(entry.level, theme))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(format!(" Logs ({}) ", buffer.len())),
    );
    f.render_widget(list, area);
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "{} {:<5} {}",
        entry.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

fn log_level_style(level: LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default().fg(theme.error),
        LogLevel::Warn => Style::default().fg(theme.log_warn),
        LogLevel::Info => Style::default().fg(theme.log_info),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.muted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_log_entry() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            message: "Division by zero".to_string(),
        };
        assert!(format_log_entry(&entry).ends_with(" WARN  Division by zero"));
    }
}
