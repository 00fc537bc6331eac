//! Shared style definitions for the search box.

use ratatui::style::{Color, Modifier, Style};

pub const BORDER_FOCUSED: Style = Style::new().fg(Color::Cyan);

pub const BORDER_UNFOCUSED: Style = Style::new().fg(Color::DarkGray);

#[inline]
pub fn border_style(focused: bool) -> Style {
    if focused {
        BORDER_FOCUSED
    } else {
        BORDER_UNFOCUSED
    }
}

/// Style for the highlighted candidate row.
pub fn row_highlight_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub const HIGHLIGHT_SYMBOL: &str = "▶ ";

/// Dimmed hint text.
pub const TEXT_DIM: Style = Style::new().fg(Color::DarkGray);

/// Loading text.
pub const TEXT_WARNING: Style = Style::new().fg(Color::Yellow);

pub const TEXT_ERROR: Style = Style::new().fg(Color::Red);

pub const TEXT_SUCCESS: Style = Style::new().fg(Color::Green);

pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub const KEY_HINT: Style = Style::new().fg(Color::Yellow);
