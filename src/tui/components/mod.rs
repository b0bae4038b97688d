// Components module - the panels of the calculator screen
//
// - Title bar: app name and focused panel
// - Display: expression and result lines
// - Keypad: key legend with the pending operator highlighted
// - History: completed calculations with selection
// - Logs: recent tracing events
// - Status bar: uptime, history size, sync state
// - Toast: transient notification

pub mod display_panel;
pub mod formatters;
pub mod history_panel;
pub mod keypad_panel;
pub mod logs_panel;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use toast::Toast;
