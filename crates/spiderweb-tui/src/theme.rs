//! Harbor palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const STATUS_UP: Color = Color::Rgb(115, 201, 144); // #73c990
pub const STATUS_DOWN: Color = Color::Rgb(235, 102, 94); // #eb665e
pub const STATUS_ISSUE: Color = Color::Rgb(235, 187, 90); // #ebbb5a
pub const ACCENT_BLUE: Color = Color::Rgb(106, 166, 235); // #6aa6eb
pub const ACCENT_TEAL: Color = Color::Rgb(95, 203, 197); // #5fcbc5

// ── Extended Palette ──────────────────────────────────────────────────

pub const FG_PRIMARY: Color = Color::Rgb(205, 211, 222); // #cdd3de
pub const FG_DIM: Color = Color::Rgb(133, 142, 159); // #858e9f
pub const BORDER_GRAY: Color = Color::Rgb(84, 92, 110); // #545c6e
pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 48, 60); // #2a303c

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ACCENT_BLUE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT_BLUE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(ACCENT_BLUE)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(FG_DIM)
}

/// Error banner (failed collection, lost connection).
pub fn banner_error() -> Style {
    Style::default()
        .fg(STATUS_DOWN)
        .add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  r retry").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD)
}
