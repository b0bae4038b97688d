// Session - one calculator bound to its history and its display
//
// Every key goes through `press`: the engine settles first, the in-memory
// history is updated, the display renderer gets the new snapshot, and only
// then is persistence dispatched. Nothing here awaits.

use crate::calculator::{CalcError, DisplaySnapshot, Engine, Input, Outcome};
use crate::events::AppEvent;
use crate::history::{History, HistoryEntry, HistoryStore, LocalStore};

/// Consumes engine state after each mutating operation
pub trait DisplayRenderer {
    fn render(&mut self, snapshot: &DisplaySnapshot);
}

/// Keeps every snapshot it was given
#[derive(Debug, Default)]
pub struct SnapshotRecorder {
    pub frames: Vec<DisplaySnapshot>,
}

impl DisplayRenderer for SnapshotRecorder {
    fn render(&mut self, snapshot: &DisplaySnapshot) {
        self.frames.push(snapshot.clone());
    }
}

pub struct Session<R, S = LocalStore> {
    engine: Engine,
    history: History,
    renderer: R,
    store: S,
}

impl<R: DisplayRenderer, S: HistoryStore> Session<R, S> {
    pub fn new(engine: Engine, history: History, renderer: R, store: S) -> Self {
        let mut session = Self {
            engine,
            history,
            renderer,
            store,
        };
        session.render();
        session
    }

    /// Apply one key press
    pub fn press(&mut self, input: Input) -> Result<Outcome, CalcError> {
        let outcome = self.engine.apply(input);

        let recorded = match &outcome {
            Ok(Outcome::Evaluated(evaluation)) => {
                let entry = HistoryEntry::from_evaluation(evaluation);
                tracing::info!("{} = {}", entry.expression, self.engine.display().result);
                self.history.push(entry.clone());
                Some((*evaluation, entry))
            }
            _ => None,
        };

        if !matches!(outcome, Ok(Outcome::Ignored)) {
            self.render();
        }

        if let Some((evaluation, entry)) = recorded {
            self.store.record(&evaluation, &entry);
        }

        outcome
    }

    /// Load a history entry back into the calculator
    pub fn recall(&mut self, index: usize) -> Outcome {
        let Some(entry) = self.history.get(index) else {
            return Outcome::Ignored;
        };
        let outcome = self.engine.recall(&entry.expression);
        if outcome == Outcome::Ignored {
            tracing::debug!("Cannot recall history entry {:?}", entry.expression);
        } else {
            self.render();
        }
        outcome
    }

    pub fn delete_entry(&mut self, index: usize) -> Option<HistoryEntry> {
        let removed = self.history.remove(index)?;
        self.store.delete(&removed);
        Some(removed)
    }

    pub fn clear_history(&mut self) -> usize {
        let count = self.history.clear();
        self.store.clear();
        count
    }

    pub fn refresh_history(&self) {
        self.store.refresh();
    }

    /// Fold a background sync result into the in-memory history
    pub fn apply_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::HistoryLoaded(entries) => self.history.replace_all(entries.clone()),
            AppEvent::HistoryDeleted { id } => {
                self.history.remove_id(*id);
            }
            AppEvent::HistoryCleared { .. } => {
                self.history.clear();
            }
            AppEvent::SyncFailed { .. } | AppEvent::SessionExpired => {}
        }
    }

    pub fn display(&self) -> DisplaySnapshot {
        self.engine.display()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn render(&mut self) {
        let snapshot = self.engine.display();
        self.renderer.render(&snapshot);
    }
}
