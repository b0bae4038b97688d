// Status bar component
//
// Uptime, history size, sync state, theme and the focus key hint.

use crate::tui::app::{App, SyncState};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let history = app.history();
    let sync_icon = match app.sync {
        SyncState::Local => "💾",
        SyncState::Online => "☁",
        SyncState::Offline | SyncState::Expired => "⚠",
    };

    let status_text = if Breakpoint::from_width(area.width).at_least(Breakpoint::Wide) {
        format!(
            " {} │ 📜 {}/{} │ {} {} │ 🎨 {} │ Tab focus · ? help · q quit",
            app.uptime(),
            history.len(),
            history.capacity(),
            sync_icon,
            app.sync.label(),
            app.theme.name,
        )
    } else {
        format!(
            " 📜 {} │ {} {} │ 🎨 {} │ ? help",
            history.len(),
            sync_icon,
            app.sync.label(),
            app.theme.name,
        )
    };

    let color = match app.sync {
        SyncState::Offline | SyncState::Expired => app.theme.log_warn,
        _ => app.theme.status_bar,
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
