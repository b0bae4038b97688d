// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --edit: Open config file in $EDITOR
// - config --update: Merge new defaults into existing config
// - config --path: Print the config file path
// - eval <tokens...>: Run a key script headlessly and print the result

use crate::calculator::{Engine, Outcome};
use crate::config::{Config, VERSION};
use crate::history::{History, HistoryStore, LocalStore};
use crate::keys::{self, ScriptError};
use crate::session::{DisplayRenderer, Session, SnapshotRecorder};
use crate::theme::Theme;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::Command;

/// kogui - terminal calculator with synced history
#[derive(Parser)]
#[command(name = "kogui")]
#[command(version = VERSION)]
#[command(about = "Terminal calculator with synced history", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Update config with new defaults (preserves user values)
        #[arg(long)]
        update: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Evaluate a key script, e.g. `kogui eval 5 + 3 + 2 =`
    Eval {
        /// Keys: numbers (12.5, -3), operators (+ - x / %), =, neg, pct, clear
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,

        /// Print the display after every key
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Handle CLI commands. Returns true if a command was handled (exit after).
pub fn handle_cli() -> bool {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config {
            show,
            reset,
            edit,
            update,
            path,
        }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else if edit {
                handle_config_edit();
            } else if update {
                handle_config_update();
            } else {
                println!("Usage: kogui config [--show|--reset|--edit|--update|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --edit    Open config file in $EDITOR");
                println!("  --update  Update config with new defaults (preserves user values)");
                println!("  --path    Show config file path");
            }
            true
        }
        Some(Commands::Eval { tokens, verbose }) => {
            handle_eval(&tokens.join(" "), verbose);
            true
        }
        None => false, // No subcommand, run the calculator
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scripted evaluation
// ─────────────────────────────────────────────────────────────────────────────

/// Feed a script through a session
///
/// Calculator errors are reported on stderr and do not stop the script.
/// Returns whether every key was accepted without error.
pub fn run_script<R: DisplayRenderer, S: HistoryStore>(
    session: &mut Session<R, S>,
    script: &str,
) -> Result<bool, ScriptError> {
    let inputs = keys::parse_script(script)?;
    let mut ok = true;

    for input in inputs {
        match session.press(input) {
            Ok(Outcome::Evaluated(evaluation)) => {
                tracing::debug!("{} = {}", evaluation.expression(), evaluation.result);
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: {}", e);
                ok = false;
            }
        }
    }

    Ok(ok)
}

fn handle_eval(script: &str, verbose: bool) {
    let config = Config::from_env();
    let mut session = Session::new(
        Engine::with_max_entry_len(config.input.max_entry_len),
        History::new(config.history.max_entries),
        SnapshotRecorder::default(),
        LocalStore,
    );

    let ok = match run_script(&mut session, script) {
        Ok(ok) => ok,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if verbose {
        for frame in &session.renderer().frames {
            println!("{:>24} │ {}", frame.expression, frame.result);
        }
        for entry in session.history().iter().rev() {
            println!("history: {} = {}", entry.expression, crate::calculator::format_number(entry.result));
        }
    }

    let display = session.display();
    match session.history().get(0) {
        Some(entry) if display.expression.is_empty() => {
            println!("{} = {}", entry.expression, display.result)
        }
        _ if !display.expression.is_empty() => {
            println!("{} │ {}", display.expression, display.result)
        }
        _ => println!("{}", display.result),
    }

    if !ok {
        std::process::exit(1);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Config management
// ─────────────────────────────────────────────────────────────────────────────

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("theme = {:?}  # {}", config.theme, Theme::list_available().join(", "));
    println!("log_dir = {:?}", config.log_dir.display().to_string());
    println!("enable_tui = {}", config.enable_tui);
    println!();
    println!("[input]");
    println!("max_entry_len = {}", config.input.max_entry_len);
    println!();
    println!("[history]");
    println!("max_entries = {}", config.history.max_entries);
    println!("visible_entries = {}", config.history.visible_entries);
    println!();
    println!("[remote]");
    println!("enabled = {}", config.remote.enabled);
    println!("api_url = {:?}", config.remote.api_url);
    println!("timeout_secs = {}", config.remote.timeout_secs);
    println!(
        "access_token = {}",
        if config.remote.access_token.is_some() { "(set)" } else { "(unset)" }
    );
    println!(
        "refresh_token = {}",
        if config.remote.refresh_token.is_some() { "(set)" } else { "(unset)" }
    );
    println!();
    println!("[features]");
    println!("journal = {}", config.features.journal);
    println!("remote_sync = {}", config.features.remote_sync);
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!("file_dir = {:?}", config.logging.file_dir.display().to_string());
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());
    println!("file_prefix = {:?}", config.logging.file_prefix);

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match Command::new(&editor).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}

fn handle_config_update() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
        return;
    }

    // Regenerate from the effective config so user values survive
    let updated = Config::from_env().to_toml();

    let backup_path = path.with_extension("toml.bak");
    if let Err(e) = std::fs::copy(&path, &backup_path) {
        eprintln!("Warning: Could not create backup: {}", e);
    } else {
        println!("Backup created: {}", backup_path.display());
    }

    if let Err(e) = std::fs::write(&path, updated) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config updated with latest structure: {}", path.display());
    println!("Your values have been preserved.");
}
