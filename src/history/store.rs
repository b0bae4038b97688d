// History store - where completed calculations go after the display updates
//
// The session calls these hooks after the engine and the in-memory history
// are settled. Implementations must not block: persistence is fire-and-forget.

use super::{HistoryEntry, SyncCommand};
use crate::calculator::Evaluation;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

pub trait HistoryStore {
    /// A calculation completed
    fn record(&self, evaluation: &Evaluation, entry: &HistoryEntry);

    /// An entry was removed from the in-memory list
    fn delete(&self, entry: &HistoryEntry);

    /// The in-memory list was cleared
    fn clear(&self);

    /// Ask for a fresh copy of persisted history
    fn refresh(&self);
}

/// Keeps history in memory only
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl HistoryStore for LocalStore {
    fn record(&self, _evaluation: &Evaluation, _entry: &HistoryEntry) {}
    fn delete(&self, _entry: &HistoryEntry) {}
    fn clear(&self) {}
    fn refresh(&self) {}
}

impl<T: HistoryStore + ?Sized> HistoryStore for Box<T> {
    fn record(&self, evaluation: &Evaluation, entry: &HistoryEntry) {
        (**self).record(evaluation, entry)
    }
    fn delete(&self, entry: &HistoryEntry) {
        (**self).delete(entry)
    }
    fn clear(&self) {
        (**self).clear()
    }
    fn refresh(&self) {
        (**self).refresh()
    }
}

/// Forwards history changes to the background sync worker
#[derive(Debug, Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<SyncCommand>,
}

impl SyncHandle {
    pub fn new(tx: mpsc::Sender<SyncCommand>) -> Self {
        Self { tx }
    }

    fn dispatch(&self, command: SyncCommand) {
        match self.tx.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(command)) => {
                tracing::warn!("History sync queue full, dropping {:?}", command);
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("History sync worker stopped");
            }
        }
    }
}

impl HistoryStore for SyncHandle {
    fn record(&self, evaluation: &Evaluation, entry: &HistoryEntry) {
        self.dispatch(SyncCommand::Save {
            evaluation: *evaluation,
            entry: entry.clone(),
        });
    }

    fn delete(&self, entry: &HistoryEntry) {
        // Local-only entries have nothing to delete remotely
        if let Some(id) = entry.id {
            self.dispatch(SyncCommand::Delete { id });
        }
    }

    fn clear(&self) {
        self.dispatch(SyncCommand::Clear);
    }

    fn refresh(&self) {
        self.dispatch(SyncCommand::Fetch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::BinaryOp;

    fn evaluation() -> Evaluation {
        Evaluation {
            lhs: 2.0,
            op: BinaryOp::Add,
            rhs: 3.0,
            result: 5.0,
        }
    }

    #[test]
    fn test_sync_handle_forwards_commands() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle = SyncHandle::new(tx);
        let ev = evaluation();
        let entry = HistoryEntry::from_evaluation(&ev);

        handle.record(&ev, &entry);
        handle.refresh();
        handle.clear();

        assert!(matches!(rx.try_recv(), Ok(SyncCommand::Save { .. })));
        assert!(matches!(rx.try_recv(), Ok(SyncCommand::Fetch)));
        assert!(matches!(rx.try_recv(), Ok(SyncCommand::Clear)));
    }

    #[test]
    fn test_local_entries_are_not_deleted_remotely() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle = SyncHandle::new(tx);

        handle.delete(&HistoryEntry::new("1 + 1", 2.0));
        assert!(rx.try_recv().is_err());

        let mut remote = HistoryEntry::new("1 + 1", 2.0);
        remote.id = Some(12);
        handle.delete(&remote);
        assert!(matches!(rx.try_recv(), Ok(SyncCommand::Delete { id: 12 })));
    }

    #[test]
    fn test_full_or_closed_queue_does_not_block() {
        let (tx, rx) = mpsc::channel(1);
        let handle = SyncHandle::new(tx);
        handle.refresh();
        handle.refresh();
        drop(rx);
        handle.refresh();
    }
}
