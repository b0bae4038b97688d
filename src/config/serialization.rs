//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

/// Quote a string as a TOML basic string
fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

impl Config {
    /// Render the full config file, with comments
    ///
    /// Tokens are never written; they only appear as commented hints.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# kogui configuration

# Theme: Kogui Dark, Kogui Light, Terminal (press 't' in the TUI to cycle)
theme = {theme}

# Directory for the calculation journal (kogui-<session>.jsonl)
log_dir = {log_dir}

# Entry buffer
[input]
max_entry_len = {max_entry_len}

# History retention
[history]
max_entries = {max_entries}
visible_entries = {visible_entries}

# Remote history service
# Tokens are best set via KOGUI_ACCESS_TOKEN / KOGUI_REFRESH_TOKEN
[remote]
enabled = {remote_enabled}
api_url = {api_url}
timeout_secs = {timeout_secs}
# access_token = "..."
# refresh_token = "..."

# Feature flags
[features]
journal = {journal}
remote_sync = {remote_sync}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = {log_file_rotation}  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            theme = quoted(&self.theme),
            log_dir = quoted(&self.log_dir.display().to_string()),
            max_entry_len = self.input.max_entry_len,
            max_entries = self.history.max_entries,
            visible_entries = self.history.visible_entries,
            remote_enabled = self.remote.enabled,
            api_url = quoted(&self.remote.api_url),
            timeout_secs = self.remote.timeout_secs,
            journal = self.features.journal,
            remote_sync = self.features.remote_sync,
            log_level = quoted(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = quoted(&self.logging.file_dir.display().to_string()),
            log_file_rotation = quoted(self.logging.file_rotation.as_str()),
            log_file_prefix = quoted(&self.logging.file_prefix),
        )
    }
}
