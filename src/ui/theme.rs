//! Popcorn theme
//!
//! Dark slate background with a violet accent and a warm star yellow.

use ratatui::style::{Color, Modifier, Style};

/// Color palette and style helpers
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #212529
    pub const BACKGROUND: Color = Color::Rgb(0x21, 0x25, 0x29);

    /// Panels: #2b3035
    pub const PANEL: Color = Color::Rgb(0x2b, 0x30, 0x35);

    /// Primary: #7950f2 (violet)
    pub const PRIMARY: Color = Color::Rgb(0x79, 0x50, 0xf2);

    /// Primary light: #9775fa
    pub const PRIMARY_LIGHT: Color = Color::Rgb(0x97, 0x75, 0xfa);

    /// Star: #fcc419
    pub const STAR: Color = Color::Rgb(0xfc, 0xc4, 0x19);

    /// Text: #dee2e6
    pub const TEXT: Color = Color::Rgb(0xde, 0xe2, 0xe6);

    /// Dim: #868e96
    pub const DIM: Color = Color::Rgb(0x86, 0x8e, 0x96);

    /// Error: #fa5252
    pub const ERROR: Color = Color::Rgb(0xfa, 0x52, 0x52);

    /// Border: #495057
    pub const BORDER: Color = Color::Rgb(0x49, 0x50, 0x57);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    /// Star ratings
    pub fn star() -> Style {
        Style::default().fg(Self::STAR).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted list row
    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Search input
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::STAR)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::DIM)
    }
}
