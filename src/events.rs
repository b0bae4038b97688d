// Events that flow from background tasks to the TUI
//
// The history sync worker runs independently of the calculator. Whatever it
// learns from the remote service comes back to the UI loop as an AppEvent,
// which the app applies to its in-memory history between key presses.

use crate::history::HistoryEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Fresh history snapshot from the remote service
    HistoryLoaded(Vec<HistoryEntry>),

    /// A remote entry was deleted
    HistoryDeleted { id: i64 },

    /// Remote history was cleared
    HistoryCleared { count: usize },

    /// A sync operation failed; local state is unaffected
    SyncFailed {
        action: &'static str,
        message: String,
    },

    /// Token refresh failed; remote sync is off until the user logs in again
    SessionExpired,
}

impl AppEvent {
    /// Short description for the logs panel and toasts
    pub fn summary(&self) -> String {
        match self {
            Self::HistoryLoaded(entries) => format!("History synced ({} entries)", entries.len()),
            Self::HistoryDeleted { id } => format!("Deleted remote entry #{}", id),
            Self::HistoryCleared { count } => format!("Cleared {} remote entries", count),
            Self::SyncFailed { action, message } => format!("Sync {} failed: {}", action, message),
            Self::SessionExpired => "Session expired, history is local only".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::SyncFailed { .. } | Self::SessionExpired)
    }
}
