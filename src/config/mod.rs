//! Configuration for the calculator
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/kogui/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod calculator;
mod features;
mod observability;
mod remote;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use calculator::{FileHistory, FileInput, HistoryConfig, InputConfig};
pub use features::{Features, FileFeatures};
pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use remote::{FileRemote, RemoteConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Theme used when nothing is configured
pub const DEFAULT_THEME: &str = "Kogui Dark";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the calculation journal
    pub log_dir: PathBuf,

    /// Whether to run the TUI (disabled for headless stdin mode)
    pub enable_tui: bool,

    /// Theme name: "Kogui Dark", "Kogui Light", "Terminal"
    pub theme: String,

    /// Entry buffer limits
    pub input: InputConfig,

    /// History retention and display
    pub history: HistoryConfig,

    /// Remote history service
    pub remote: RemoteConfig,

    /// Feature flags for optional modules
    pub features: Features,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            enable_tui: true,
            theme: DEFAULT_THEME.to_string(),
            input: InputConfig::default(),
            history: HistoryConfig::default(),
            remote: RemoteConfig::default(),
            features: Features::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// ~/.local/share/kogui (platform data dir), or ./logs when unavailable
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("kogui"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub log_dir: Option<String>,
    pub theme: Option<String>,

    /// Optional [input] section
    pub input: Option<FileInput>,

    /// Optional [history] section
    pub history: Option<FileHistory>,

    /// Optional [remote] section
    pub remote: Option<FileRemote>,

    /// Optional [features] section
    pub features: Option<FileFeatures>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/kogui/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("kogui").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the single source of truth
        let template = Self::default().to_toml();
        let _ = std::fs::write(&path, template);
    }

    /// Load file config if it exists
    ///
    /// Exits the process if the file exists but cannot be parsed. A broken
    /// config should fail fast, not silently fall back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Invalid boolean values (use true/false)");
                    eprintln!("    - Negative or non-integer limits");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `kogui config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        Self::from_sources(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // Journal directory: env > file > default
        let log_dir = env("KOGUI_LOG_DIR")
            .or(file.log_dir)
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        // TUI toggle: env only (runtime flag)
        let enable_tui = env("KOGUI_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        // Theme: env > file > default
        let theme = env("KOGUI_THEME")
            .or(file.theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());

        let input = InputConfig::from_file(file.input);
        let history = HistoryConfig::from_file(file.history);
        let features = Features::from_file(file.features);
        let logging = LoggingConfig::from_file(file.logging);

        // Remote: env overrides for URL and tokens
        let remote = RemoteConfig::from_file(
            file.remote,
            env("KOGUI_API_URL"),
            env("KOGUI_ACCESS_TOKEN"),
            env("KOGUI_REFRESH_TOKEN"),
        );

        Self {
            log_dir,
            enable_tui,
            theme,
            input,
            history,
            remote,
            features,
            logging,
        }
    }

    /// Whether remote history should be used at all
    pub fn remote_sync_enabled(&self) -> bool {
        self.features.remote_sync && self.remote.enabled
    }
}
