// History module - completed calculations, newest first
//
// The in-memory list is the source of truth for what the UI shows. Remote
// persistence and the JSONL journal sit behind the sync worker and only ever
// feed results back through AppEvents, so the calculator never waits on them.
//
// Layout:
// - History / HistoryEntry: bounded most-recent-first list (this file)
// - store: the HistoryStore seam the session calls into
// - remote: HTTP client for the remote history service
// - journal: append-only JSONL file of completed calculations
// - sync: background worker that drives remote + journal

pub mod journal;
pub mod remote;
pub mod store;
pub mod sync;

pub use journal::Journal;
pub use remote::{HistoryError, RemoteHistory};
pub use store::{HistoryStore, LocalStore, SyncHandle};
pub use sync::{HistorySync, SyncCommand};

use crate::calculator::Evaluation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of retained entries
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// One completed calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Server-side identifier; `None` for entries that only exist locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// `"A op B"`
    pub expression: String,
    #[serde(with = "result_value")]
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

/// JSON has no NaN or infinity, so those results are written as display text
mod result_value {
    use crate::calculator::{format_number, parse_literal};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&format_number(*value))
        }
    }

    /// Numbers, display text, or `null` (older journals) read back as NaN
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            Some(Repr::Number(n)) => Ok(n),
            Some(Repr::Text(text)) => parse_literal(&text).map_err(serde::de::Error::custom),
            None => Ok(f64::NAN),
        }
    }
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: f64) -> Self {
        Self {
            id: None,
            expression: expression.into(),
            result,
            timestamp: Utc::now(),
        }
    }

    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self::new(evaluation.expression(), evaluation.result)
    }

    /// True if the entry has been persisted remotely
    pub fn is_remote(&self) -> bool {
        self.id.is_some()
    }
}

/// Bounded list of history entries, most recent first
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a new entry at the front, dropping the oldest past capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
        self.entries.remove(index)
    }

    /// Remove a remotely persisted entry by server id
    pub fn remove_id(&mut self, id: i64) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|e| e.id == Some(id))?;
        self.entries.remove(index)
    }

    /// Drop every entry, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Replace the list with a fetched snapshot
    ///
    /// Entries are re-sorted newest first (stable for equal timestamps) and
    /// truncated to capacity.
    pub fn replace_all(&mut self, mut entries: Vec<HistoryEntry>) {
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(self.capacity);
        self.entries = entries.into();
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(n: i32) -> HistoryEntry {
        HistoryEntry::new(format!("{} + 0", n), n as f64)
    }

    #[test]
    fn test_newest_first() {
        let mut history = History::default();
        history.push(entry(1));
        history.push(entry(2));
        history.push(entry(3));
        let results: Vec<f64> = history.iter().map(|e| e.result).collect();
        assert_eq!(results, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_51st_entry_drops_oldest() {
        let mut history = History::new(50);
        for n in 1..=51 {
            history.push(entry(n));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.get(0).unwrap().result, 51.0);
        assert_eq!(history.get(49).unwrap().result, 2.0);
        assert!(history.iter().all(|e| e.result != 1.0));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut history = History::default();
        history.push(entry(1));
        history.push(entry(2));
        let removed = history.remove(0).unwrap();
        assert_eq!(removed.result, 2.0);
        assert!(history.remove(5).is_none());
        assert_eq!(history.clear(), 1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_remove_by_remote_id() {
        let mut history = History::default();
        let mut remote = entry(7);
        remote.id = Some(42);
        history.push(remote);
        history.push(entry(8));
        assert!(history.remove_id(99).is_none());
        assert_eq!(history.remove_id(42).unwrap().result, 7.0);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_replace_all_sorts_and_truncates() {
        let mut history = History::new(2);
        let now = Utc::now();
        let mut older = entry(1);
        older.timestamp = now - Duration::minutes(5);
        let mut newest = entry(2);
        newest.timestamp = now;
        let mut oldest = entry(3);
        oldest.timestamp = now - Duration::minutes(10);

        history.replace_all(vec![older, oldest, newest]);
        let results: Vec<f64> = history.iter().map(|e| e.result).collect();
        assert_eq!(results, vec![2.0, 1.0]);
    }

    #[test]
    fn test_iter_reverses_to_oldest_first() {
        let mut history = History::default();
        history.push(entry(1));
        history.push(entry(2));
        let results: Vec<f64> = history.iter().rev().map(|e| e.result).collect();
        assert_eq!(results, vec![1.0, 2.0]);
    }

    #[test]
    fn test_non_finite_results_survive_json() {
        let json = serde_json::to_string(&HistoryEntry::new("5 % 0", f64::NAN)).unwrap();
        assert!(json.contains(r#""result":"NaN""#));
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert!(back.result.is_nan());

        let json = serde_json::to_string(&HistoryEntry::new("1e308 × 10", f64::INFINITY)).unwrap();
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.result, f64::INFINITY);

        let legacy = r#"{"expression":"5 % 0","result":null,"timestamp":"2026-01-01T00:00:00Z"}"#;
        let back: HistoryEntry = serde_json::from_str(legacy).unwrap();
        assert!(back.result.is_nan());
    }

    #[test]
    fn test_entry_serializes_without_local_id() {
        let json = serde_json::to_value(entry(3)).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["expression"], "3 + 0");
    }
}
