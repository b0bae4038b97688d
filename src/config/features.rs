//! Feature flags configuration
//!
//! Feature flags for optional modules (opt-out: default enabled).

use serde::Deserialize;

/// Feature flags for optional modules (opt-out: default enabled)
#[derive(Debug, Clone)]
pub struct Features {
    /// Journal: append completed calculations to a JSONL file
    pub journal: bool,

    /// Remote sync: send history to the remote service when configured
    pub remote_sync: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            journal: true,
            remote_sync: true,
        }
    }
}

/// Feature flags as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileFeatures {
    pub journal: Option<bool>,
    pub remote_sync: Option<bool>,
}

impl Features {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileFeatures>) -> Self {
        let file = file.unwrap_or_default();

        Self {
            journal: file.journal.unwrap_or(true),
            remote_sync: file.remote_sync.unwrap_or(true),
        }
    }
}
