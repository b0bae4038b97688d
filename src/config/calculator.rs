//! Calculator input and history configuration

use crate::calculator::DEFAULT_MAX_ENTRY_LEN;
use crate::history::DEFAULT_MAX_ENTRIES;
use serde::Deserialize;

/// Entry buffer limits
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Maximum characters in the entry being typed
    pub max_entry_len: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_entry_len: DEFAULT_MAX_ENTRY_LEN,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileInput {
    pub max_entry_len: Option<usize>,
}

impl InputConfig {
    pub fn from_file(file: Option<FileInput>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            max_entry_len: file
                .max_entry_len
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_MAX_ENTRY_LEN),
        }
    }
}

/// History retention and display
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Entries kept in memory (oldest dropped first)
    pub max_entries: usize,
    /// Rows shown in the history panel before scrolling
    pub visible_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            visible_entries: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileHistory {
    pub max_entries: Option<usize>,
    pub visible_entries: Option<usize>,
}

impl HistoryConfig {
    pub fn from_file(file: Option<FileHistory>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        let max_entries = file
            .max_entries
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_entries);

        Self {
            max_entries,
            visible_entries: file
                .visible_entries
                .filter(|&n| n > 0)
                .unwrap_or(defaults.visible_entries)
                .min(max_entries),
        }
    }
}
