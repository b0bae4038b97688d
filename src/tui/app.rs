// TUI application state
//
// Owns the calculator session and everything the UI needs around it: focus,
// history selection, theme, toast and modal. The session's display renderer
// is a `DisplayModel` that keeps the latest snapshot for the next frame.

use super::clipboard;
use super::components::Toast;
use super::modal::Modal;
use crate::calculator::{DisplaySnapshot, Engine, Input, Outcome};
use crate::config::Config;
use crate::events::AppEvent;
use crate::history::{History, HistoryStore};
use crate::logging::LogBuffer;
use crate::session::{DisplayRenderer, Session};
use crate::theme::Theme;
use std::time::Instant;

/// Latest display state, rendered on the next frame
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub snapshot: DisplaySnapshot,
}

impl Default for DisplayModel {
    fn default() -> Self {
        Self {
            snapshot: DisplaySnapshot {
                expression: String::new(),
                result: "0".to_string(),
                error: None,
            },
        }
    }
}

impl DisplayRenderer for DisplayModel {
    fn render(&mut self, snapshot: &DisplaySnapshot) {
        self.snapshot = snapshot.clone();
    }
}

/// Which panel receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Calculator,
    History,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Calculator => Focus::History,
            Focus::History => Focus::Calculator,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Focus::Calculator => "Calculator",
            Focus::History => "History",
        }
    }
}

/// Remote history state shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No remote service configured
    Local,
    /// Last remote call succeeded (or none made yet)
    Online,
    /// Last remote call failed
    Offline,
    /// Token refresh failed, remote sync stopped
    Expired,
}

impl SyncState {
    pub fn label(&self) -> &'static str {
        match self {
            SyncState::Local => "local",
            SyncState::Online => "synced",
            SyncState::Offline => "offline",
            SyncState::Expired => "session expired",
        }
    }
}

pub struct App {
    pub session: Session<DisplayModel, Box<dyn HistoryStore>>,
    pub focus: Focus,
    /// Selected history row (newest = 0)
    pub selected: Option<usize>,
    pub visible_entries: usize,
    pub theme: Theme,
    pub log_buffer: LogBuffer,
    pub toast: Option<Toast>,
    pub modal: Option<Modal>,
    pub sync: SyncState,
    pub should_quit: bool,
    pub start_time: Instant,
}

impl App {
    pub fn new(
        config: &Config,
        log_buffer: LogBuffer,
        store: Box<dyn HistoryStore>,
        remote: bool,
    ) -> Self {
        let session = Session::new(
            Engine::with_max_entry_len(config.input.max_entry_len),
            History::new(config.history.max_entries),
            DisplayModel::default(),
            store,
        );

        Self {
            session,
            focus: Focus::default(),
            selected: None,
            visible_entries: config.history.visible_entries,
            theme: Theme::by_name(&config.theme),
            log_buffer,
            toast: None,
            modal: None,
            sync: if remote {
                SyncState::Online
            } else {
                SyncState::Local
            },
            should_quit: false,
            start_time: Instant::now(),
        }
    }

    pub fn display(&self) -> &DisplaySnapshot {
        &self.session.renderer().snapshot
    }

    pub fn history(&self) -> &History {
        self.session.history()
    }

    /// Feed one calculator input; errors become a toast
    pub fn press(&mut self, input: Input) {
        match self.session.press(input) {
            Ok(Outcome::Evaluated(_)) => {
                // New entry lands at the top; keep the same row selected
                if let Some(idx) = self.selected {
                    self.selected = Some(idx + 1);
                }
                self.clamp_selection();
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("{}", e);
                self.show_toast(format!("✗ {}", e.label()));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // History panel
    // ─────────────────────────────────────────────────────────────────────

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        if self.focus == Focus::History && self.selected.is_none() && !self.history().is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = match self.selected {
            Some(idx) => Some(idx.saturating_sub(1)),
            None if !self.history().is_empty() => Some(0),
            None => None,
        };
    }

    pub fn select_next(&mut self) {
        let last = self.history().len().checked_sub(1);
        self.selected = match (self.selected, last) {
            (_, None) => None,
            (Some(idx), Some(last)) => Some((idx + 1).min(last)),
            (None, Some(_)) => Some(0),
        };
    }

    /// Load the selected entry into the calculator
    pub fn recall_selected(&mut self) {
        let Some(idx) = self.selected else {
            return;
        };
        if self.session.recall(idx) == Outcome::Ignored {
            self.show_toast("✗ Cannot recall entry");
        } else {
            self.focus = Focus::Calculator;
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(idx) = self.selected else {
            return;
        };
        if let Some(entry) = self.session.delete_entry(idx) {
            tracing::info!("Deleted {} = {}", entry.expression, entry.result);
            self.show_toast("✓ Entry deleted");
        }
        self.clamp_selection();
    }

    pub fn clear_history(&mut self) {
        let count = self.session.clear_history();
        self.selected = None;
        tracing::info!("Cleared {} history entries", count);
        self.show_toast(format!("✓ Cleared {} entries", count));
    }

    pub fn refresh_history(&mut self) {
        if self.sync == SyncState::Local || self.sync == SyncState::Expired {
            self.show_toast("History is local only");
            return;
        }
        self.session.refresh_history();
        self.show_toast("Refreshing history…");
    }

    fn clamp_selection(&mut self) {
        let len = self.history().len();
        self.selected = match self.selected {
            Some(_) if len == 0 => None,
            Some(idx) => Some(idx.min(len - 1)),
            None => None,
        };
    }

    // ─────────────────────────────────────────────────────────────────────
    // Background events
    // ─────────────────────────────────────────────────────────────────────

    pub fn apply_event(&mut self, event: AppEvent) {
        match &event {
            AppEvent::SyncFailed { .. } => {
                self.sync = SyncState::Offline;
                self.show_toast(format!("✗ {}", event.summary()));
            }
            AppEvent::SessionExpired => {
                self.sync = SyncState::Expired;
                self.show_toast(format!("✗ {}", event.summary()));
            }
            _ => {
                if self.sync == SyncState::Offline {
                    self.sync = SyncState::Online;
                }
                tracing::debug!("{}", event.summary());
            }
        }

        self.session.apply_event(&event);
        self.clamp_selection();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Misc
    // ─────────────────────────────────────────────────────────────────────

    pub fn next_theme(&mut self) {
        self.theme = self.theme.next();
        self.show_toast(format!("Theme: {}", self.theme.name));
    }

    /// Copy the result line to the system clipboard
    pub fn copy_result(&mut self) {
        let text = self.display().result.clone();
        match clipboard::copy_to_clipboard(&text) {
            Ok(()) => self.show_toast(format!("✓ Copied {}", text)),
            Err(e) => {
                tracing::debug!("Clipboard unavailable: {:#}", e);
                self.show_toast("✗ Failed to copy");
            }
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    /// Get uptime as a formatted string
    pub fn uptime(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{BinaryOp, CalcError};
    use crate::history::{HistoryEntry, LocalStore};

    fn app() -> App {
        App::new(
            &Config::default(),
            LogBuffer::new(),
            Box::new(LocalStore),
            false,
        )
    }

    fn evaluate(app: &mut App, a: u8, op: BinaryOp, b: u8) {
        app.press(Input::Clear);
        app.press(Input::Digit(a));
        app.press(Input::Operator(op));
        app.press(Input::Digit(b));
        app.press(Input::Equals);
    }

    #[test]
    fn test_display_model_tracks_session() {
        let mut app = app();
        assert_eq!(app.display().result, "0");

        evaluate(&mut app, 7, BinaryOp::Multiply, 6);
        assert_eq!(app.display().result, "42");
        assert_eq!(app.history().get(0).unwrap().expression, "7 × 6");
    }

    #[test]
    fn test_error_shows_toast_and_flag() {
        let mut app = app();
        evaluate(&mut app, 1, BinaryOp::Divide, 0);
        assert_eq!(app.display().error, Some(CalcError::DivisionByZero));
        assert!(app.toast.as_ref().unwrap().message.contains("Division by zero"));
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_selection_follows_new_entries() {
        let mut app = app();
        evaluate(&mut app, 1, BinaryOp::Add, 1);
        evaluate(&mut app, 2, BinaryOp::Add, 2);

        app.focus_next();
        assert_eq!(app.focus, Focus::History);
        assert_eq!(app.selected, Some(0));
        app.select_next();
        assert_eq!(app.selected, Some(1));
        app.select_next();
        assert_eq!(app.selected, Some(1));

        // "1 + 1" stays selected when a new entry arrives
        evaluate(&mut app, 3, BinaryOp::Add, 3);
        assert_eq!(app.selected, Some(2));
        assert_eq!(app.history().get(2).unwrap().expression, "1 + 1");
    }

    #[test]
    fn test_recall_and_delete() {
        let mut app = app();
        evaluate(&mut app, 9, BinaryOp::Subtract, 4);
        app.press(Input::Clear);

        app.focus_next();
        app.recall_selected();
        assert_eq!(app.focus, Focus::Calculator);
        assert_eq!(app.display().expression, "9 - 4");

        app.delete_selected();
        assert!(app.history().is_empty());
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_sync_events_update_state() {
        let mut app = App::new(
            &Config::default(),
            LogBuffer::new(),
            Box::new(LocalStore),
            true,
        );
        assert_eq!(app.sync, SyncState::Online);

        app.apply_event(AppEvent::SyncFailed {
            action: "fetch",
            message: "connection refused".to_string(),
        });
        assert_eq!(app.sync, SyncState::Offline);

        let mut entry = HistoryEntry::new("2 + 2", 4.0);
        entry.id = Some(5);
        app.apply_event(AppEvent::HistoryLoaded(vec![entry]));
        assert_eq!(app.sync, SyncState::Online);
        assert_eq!(app.history().len(), 1);

        app.apply_event(AppEvent::SessionExpired);
        assert_eq!(app.sync, SyncState::Expired);
    }

    #[test]
    fn test_refresh_is_refused_when_local() {
        let mut app = app();
        app.refresh_history();
        assert_eq!(app.toast.as_ref().unwrap().message, "History is local only");
    }
}
