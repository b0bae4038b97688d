// Theme support for the TUI
//
// Named color palettes selected via config (`theme = "..."`) or cycled at
// runtime with 't'. "Terminal" uses the ANSI palette, the rest use RGB.

use ratatui::style::Color;

/// Color palette for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    // Display
    pub result: Color,
    pub expression: Color,
    pub error: Color,

    // Keypad legend
    pub key_digit: Color,
    pub key_operator: Color,
    pub key_action: Color,

    // UI elements
    pub title: Color,
    pub status_bar: Color,
    pub border: Color,
    pub highlight: Color,
    pub selection: Color,
    pub muted: Color,

    // Log levels
    pub log_warn: Color,
    pub log_info: Color,
}

/// Themes in cycle order
const THEME_NAMES: [&str; 3] = ["Kogui Dark", "Kogui Light", "Terminal"];

impl Theme {
    /// Load theme by name (case-insensitive); unknown names fall back to the default
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "kogui light" | "light" => Self::light(),
            "terminal" | "auto" => Self::terminal(),
            _ => Self::dark(),
        }
    }

    pub fn list_available() -> &'static [&'static str] {
        &THEME_NAMES
    }

    /// The theme after this one in cycle order
    pub fn next(&self) -> Self {
        let index = THEME_NAMES
            .iter()
            .position(|n| *n == self.name)
            .unwrap_or(0);
        Self::by_name(THEME_NAMES[(index + 1) % THEME_NAMES.len()])
    }

    pub fn dark() -> Self {
        Self {
            name: "Kogui Dark",
            result: Color::Rgb(0xf8, 0xf8, 0xf2),
            expression: Color::Rgb(0x8b, 0xe9, 0xfd), // cyan
            error: Color::Rgb(0xff, 0x55, 0x55),
            key_digit: Color::Rgb(0xf8, 0xf8, 0xf2),
            key_operator: Color::Rgb(0xff, 0xb8, 0x6c), // orange
            key_action: Color::Rgb(0xbd, 0x93, 0xf9),   // purple
            title: Color::Rgb(0x8b, 0xe9, 0xfd),
            status_bar: Color::Rgb(0x50, 0xfa, 0x7b), // green
            border: Color::Rgb(0x62, 0x72, 0xa4),
            highlight: Color::Rgb(0xf1, 0xfa, 0x8c), // yellow
            selection: Color::Rgb(0x44, 0x47, 0x5a),
            muted: Color::Rgb(0x62, 0x72, 0xa4),
            log_warn: Color::Rgb(0xf1, 0xfa, 0x8c),
            log_info: Color::Rgb(0x50, 0xfa, 0x7b),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Kogui Light",
            result: Color::Rgb(0x28, 0x2a, 0x36),
            expression: Color::Rgb(0x00, 0x5f, 0x87),
            error: Color::Rgb(0xc0, 0x1c, 0x28),
            key_digit: Color::Rgb(0x28, 0x2a, 0x36),
            key_operator: Color::Rgb(0xb3, 0x5c, 0x00),
            key_action: Color::Rgb(0x6c, 0x3e, 0xb8),
            title: Color::Rgb(0x00, 0x5f, 0x87),
            status_bar: Color::Rgb(0x1a, 0x7f, 0x37),
            border: Color::Rgb(0x8c, 0x95, 0x9f),
            highlight: Color::Rgb(0xb3, 0x5c, 0x00),
            selection: Color::Rgb(0xdd, 0xe3, 0xea),
            muted: Color::Rgb(0x6e, 0x77, 0x81),
            log_warn: Color::Rgb(0x9a, 0x67, 0x00),
            log_info: Color::Rgb(0x1a, 0x7f, 0x37),
        }
    }

    /// Uses the terminal's ANSI palette
    pub fn terminal() -> Self {
        Self {
            name: "Terminal",
            result: Color::White,
            expression: Color::Cyan,
            error: Color::Red,
            key_digit: Color::White,
            key_operator: Color::Yellow,
            key_action: Color::Magenta,
            title: Color::Cyan,
            status_bar: Color::Green,
            border: Color::Gray,
            highlight: Color::Yellow,
            selection: Color::DarkGray,
            muted: Color::DarkGray,
            log_warn: Color::Yellow,
            log_info: Color::Green,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_is_case_insensitive() {
        assert_eq!(Theme::by_name("kogui light").name, "Kogui Light");
        assert_eq!(Theme::by_name("TERMINAL").name, "Terminal");
        assert_eq!(Theme::by_name("no-such-theme").name, "Kogui Dark");
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut theme = Theme::default();
        let mut seen = Vec::new();
        for _ in 0..Theme::list_available().len() {
            seen.push(theme.name);
            theme = theme.next();
        }
        assert_eq!(seen, Theme::list_available());
        assert_eq!(theme.name, "Kogui Dark");
    }
}
