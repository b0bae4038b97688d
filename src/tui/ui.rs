// UI rendering - called once per frame
//
// Lays out the panels, then draws the modal and toast on top.

use super::app::{App, Focus};
use super::components::{
    display_panel, history_panel, keypad_panel, logs_panel, status_bar, title_bar,
};
use super::layout::screen_areas;
use super::modal::Modal;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = screen_areas(f.area());

    title_bar::render(f, areas.title, app);
    display_panel::render(
        f,
        areas.display,
        app.display(),
        &app.theme,
        app.focus == Focus::Calculator,
    );
    if let Some(keypad) = areas.keypad {
        keypad_panel::render(
            f,
            keypad,
            app.session.engine().pending_operator(),
            &app.theme,
        );
    }
    history_panel::render(
        f,
        areas.history,
        history_panel::HistoryView {
            history: app.history(),
            selected: app.selected,
            visible_entries: app.visible_entries,
            focused: app.focus == Focus::History,
        },
        &app.theme,
    );
    logs_panel::render(f, areas.logs, &app.log_buffer, &app.theme);
    status_bar::render(f, areas.status, app);

    match app.modal {
        Some(Modal::Help) => render_help(f, app),
        Some(Modal::ConfirmClear) => render_confirm_clear(f, app),
        None => {}
    }

    if let Some(ref toast) = app.toast {
        toast.render(f, f.area(), &app.theme);
    }
    app.clear_expired_toast();
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_help(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let key_style = Style::default().fg(theme.key_operator);
    let desc_style = Style::default().fg(theme.result);
    let header_style = Style::default()
        .fg(theme.highlight)
        .add_modifier(Modifier::BOLD);

    // "    key         description"
    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Calculator", header_style)),
        kb("0-9  .", "Enter a number"),
        kb("+ - x * /", "Operator"),
        kb("%", "Modulo"),
        kb("Enter  =", "Evaluate"),
        kb("n", "Negate"),
        kb("p", "Percent"),
        kb("Esc  c", "Clear"),
        Line::raw(""),
        Line::from(Span::styled("  History", header_style)),
        kb("Tab", "Focus history / calculator"),
        kb("↑/↓  j/k", "Select entry"),
        kb("Enter", "Recall into calculator"),
        kb("Del  d", "Delete entry"),
        kb("D", "Clear history"),
        kb("r", "Refresh from server"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("y", "Copy result"),
        kb("t", "Next theme"),
        kb("?", "Toggle this help"),
        kb("q  Ctrl+C", "Quit"),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Theme: ", desc_style),
            Span::styled(theme.name, key_style),
        ]),
    ]);

    let area = centered_rect(44, 29, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.highlight))
            .title(" Help ")
            .title_bottom(Line::from(" Press ? or Esc to close ").centered()),
    );
    f.render_widget(paragraph, area);
}

fn render_confirm_clear(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let text = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  Delete all {} entries?", app.history().len()),
            Style::default().fg(theme.result),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "  y confirm · n cancel",
            Style::default().fg(theme.muted),
        )),
    ]);

    let area = centered_rect(34, 6, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error))
                .title(" Clear history "),
        ),
        area,
    );
}
