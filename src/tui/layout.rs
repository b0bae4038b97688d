//! Responsive layout for the calculator screen.
//!
//! Width thresholds live here and nowhere else.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// < 60 cols: everything stacked, keypad hidden
    Compact,
    /// 60-99 cols: calculator left, history right
    Normal,
    /// 100+ cols: wider history with timestamps
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        *self >= min
    }
}

/// Areas of the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub title: Rect,
    pub display: Rect,
    pub keypad: Option<Rect>,
    pub history: Rect,
    pub logs: Rect,
    pub status: Rect,
}

/// Display height: border + expression line + result line + border
const DISPLAY_HEIGHT: u16 = 4;
const KEYPAD_HEIGHT: u16 = 7;
const LOGS_HEIGHT: u16 = 6;

pub fn screen_areas(area: Rect) -> ScreenAreas {
    let bp = Breakpoint::from_width(area.width);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(DISPLAY_HEIGHT + 2),
            Constraint::Length(LOGS_HEIGHT),
            Constraint::Length(2),
        ])
        .split(area);
    let (title, body, logs, status) = (rows[0], rows[1], rows[2], rows[3]);

    if !bp.at_least(Breakpoint::Normal) {
        let stacked = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(DISPLAY_HEIGHT), Constraint::Min(2)])
            .split(body);
        return ScreenAreas {
            title,
            display: stacked[0],
            keypad: None,
            history: stacked[1],
            logs,
            status,
        };
    }

    let history_pct = if bp.at_least(Breakpoint::Wide) { 55 } else { 50 };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(100 - history_pct),
            Constraint::Percentage(history_pct),
        ])
        .split(body);

    let calculator = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(DISPLAY_HEIGHT),
            Constraint::Min(KEYPAD_HEIGHT),
        ])
        .split(columns[0]);

    ScreenAreas {
        title,
        display: calculator[0],
        keypad: Some(calculator[1]),
        history: columns[1],
        logs,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_thresholds() {
        assert_eq!(Breakpoint::from_width(40), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(59), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(60), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(99), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(100), Breakpoint::Wide);
        assert!(Breakpoint::Wide.at_least(Breakpoint::Normal));
        assert!(!Breakpoint::Compact.at_least(Breakpoint::Normal));
    }

    #[test]
    fn compact_screen_hides_keypad() {
        let areas = screen_areas(Rect::new(0, 0, 50, 30));
        assert!(areas.keypad.is_none());
        assert_eq!(areas.display.width, 50);
        assert!(areas.history.y > areas.display.y);
    }

    #[test]
    fn normal_screen_puts_history_beside_calculator() {
        let areas = screen_areas(Rect::new(0, 0, 80, 30));
        let keypad = areas.keypad.unwrap();
        assert_eq!(areas.display.x, keypad.x);
        assert!(areas.history.x > areas.display.x);
        assert_eq!(areas.history.y, areas.display.y);
        assert_eq!(areas.title.height, 3);
        assert_eq!(areas.status.height, 2);
    }
}
