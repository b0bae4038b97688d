// kogui - terminal calculator with synced history
//
// A four-function calculator driven from the keyboard. Completed calculations
// go into a bounded history that can be journaled to disk and kept in sync
// with a remote history service.
//
// Architecture:
// - Calculator: pure state machine, one typed input at a time
// - Session: binds the engine to its history and its display renderer
// - History sync: background task (journal + HTTP client) fed over mpsc
// - TUI (ratatui): display, keypad legend, history, logs
// - Headless mode: reads key scripts from stdin, one calculation per line

mod calculator;
mod cli;
mod config;
mod events;
mod history;
mod keys;
mod logging;
mod session;
mod theme;
mod tui;

use anyhow::Result;
use chrono::Utc;
use config::{Config, LogRotation};
use events::AppEvent;
use history::{
    History, HistoryStore, HistorySync, Journal, LocalStore, RemoteHistory, SyncCommand,
    SyncHandle,
};
use logging::{LogBuffer, TuiLogLayer};
use session::{Session, SnapshotRecorder};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Queue depth between the session and the sync worker
const SYNC_QUEUE: usize = 64;

/// Generate a unique session ID for journal file naming
/// Format: YYYYMMDD-HHMMSS-XXXX (timestamp + 4 random hex chars)
fn generate_session_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let random = RandomState::new().build_hasher().finish();
    format!("{}-{:04x}", timestamp, random & 0xFFFF)
}

/// Install the tracing subscriber
///
/// TUI mode captures logs into `log_buffer` (stderr would garble the screen);
/// headless mode writes them to stderr. File logging is added on top of either.
/// Precedence: RUST_LOG env var > config file > default "info".
fn init_logging(
    config: &Config,
    log_buffer: &LogBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = format!("kogui={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let tui_layer = config
        .enable_tui
        .then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer =
        (!config.enable_tui).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // The guard must live for the whole program so buffered lines get flushed
    let (file_layer, guard) = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let dir = &config.logging.file_dir;
                let prefix = &config.logging.file_prefix;
                let file_appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
                    LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
                };
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Build the remote client if remote sync is configured and usable
fn remote_history(config: &Config) -> Option<RemoteHistory> {
    if !config.remote_sync_enabled() {
        tracing::debug!("Remote history disabled");
        return None;
    }

    match RemoteHistory::new(&config.remote) {
        Ok(client) if client.is_authenticated() => {
            tracing::info!("Remote history: {}", config.remote.api_url);
            Some(client)
        }
        Ok(_) => {
            tracing::warn!("Remote history enabled but no access token set, history stays local");
            None
        }
        Err(e) => {
            tracing::warn!("Remote history unavailable: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config, eval); exit if one ran
    if cli::handle_cli() {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env();
    let log_buffer = LogBuffer::new();
    let _file_guard = init_logging(&config, &log_buffer);

    let session_id = generate_session_id();
    tracing::debug!("Session ID: {}", session_id);

    let journal = if config.features.journal {
        match Journal::new(&config.log_dir, &session_id) {
            Ok(journal) => Some(journal),
            Err(e) => {
                tracing::error!("Journal disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };
    let remote = remote_history(&config);
    let remote_enabled = remote.is_some();

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(SYNC_QUEUE);

    // Spawn the sync worker only when there is somewhere to send history
    let (store, sync_handle) = if journal.is_some() || remote.is_some() {
        let (command_tx, command_rx) = mpsc::channel::<SyncCommand>(SYNC_QUEUE);
        let worker = HistorySync::new(remote, journal, command_rx, event_tx);
        let store: Box<dyn HistoryStore> = Box::new(SyncHandle::new(command_tx));
        (store, Some(tokio::spawn(worker.run())))
    } else {
        drop(event_tx);
        let store: Box<dyn HistoryStore> = Box::new(LocalStore);
        (store, None)
    };

    if config.enable_tui {
        if let Err(e) = tui::run_tui(event_rx, log_buffer, &config, store, remote_enabled).await
        {
            eprintln!("TUI error: {:#}", e);
        }
    } else {
        tracing::info!("TUI disabled, reading key scripts from stdin");
        run_headless(&config, event_rx, store, remote_enabled).await?;
    }

    // The store (and with it the command sender) is gone; let the worker drain
    tracing::info!("Shutting down...");
    if let Some(handle) = sync_handle {
        match handle.await {
            Ok(Err(e)) => tracing::error!("History sync error: {:#}", e),
            Err(e) => tracing::error!("History sync task panicked: {}", e),
            Ok(Ok(())) => {}
        }
    }

    Ok(())
}

/// One calculation script per stdin line; prints the result line after each
async fn run_headless(
    config: &Config,
    mut event_rx: mpsc::Receiver<AppEvent>,
    store: Box<dyn HistoryStore>,
    remote: bool,
) -> Result<()> {
    let mut session = Session::new(
        calculator::Engine::with_max_entry_len(config.input.max_entry_len),
        History::new(config.history.max_entries),
        SnapshotRecorder::default(),
        store,
    );
    if remote {
        session.refresh_history();
    }

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match cli::run_script(&mut session, &line) {
                    Ok(_) => println!("{}", session.display().result),
                    Err(e) => eprintln!("error: {}", e),
                }
                session.renderer_mut().frames.clear();
            }

            Some(event) = event_rx.recv() => {
                if event.is_error() {
                    tracing::warn!("{}", event.summary());
                }
                session.apply_event(&event);
            }
        }
    }

    tracing::info!("{} calculations in history", session.history().len());
    Ok(())
}
