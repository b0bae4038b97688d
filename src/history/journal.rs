// Journal - append-only record of completed calculations in JSON Lines format
//
// One JSON object per line, one file per session:
//   kogui-YYYYMMDD-HHMMSS-XXXX.jsonl
//
// Example: jq -r '"\(.expression) = \(.result)"' ~/.local/share/kogui/kogui-*.jsonl
//
// The journal is write-only from the app's point of view. Deleting or clearing
// history does not rewrite it.

use super::HistoryEntry;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Prepare the journal for a session, creating the directory if needed
    pub fn new(dir: &Path, session_id: &str) -> Result<Self> {
        fs::create_dir_all(dir).context("Failed to create journal directory")?;
        Ok(Self {
            path: dir.join(format!("kogui-{}.jsonl", session_id)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a JSON line
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open journal file")?;

        let json = serde_json::to_string(entry).context("Failed to serialize history entry")?;
        writeln!(file, "{}", json).context("Failed to write to journal file")?;

        // Visible to `tail -f` even if the process dies
        file.flush().context("Failed to flush journal file")?;

        Ok(())
    }
}
