//! Clipboard helper for the `y` key
//!
//! Uses `arboard`; the clipboard is opened per copy. Headless Linux has no
//! clipboard and reports an error here.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy text to the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .with_context(|| format!("Failed to copy {:?}", text))?;
    Ok(())
}
