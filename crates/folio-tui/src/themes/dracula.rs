//! Dracula theme
//! https://draculatheme.com/

use ratatui::style::Color;
use crate::theme::Theme;

/// Dracula default theme
pub fn default() -> Theme {
    Theme {
        background: Color::Rgb(0x28, 0x2a, 0x36), // Background
        surface: Color::Rgb(0x21, 0x22, 0x2c),    // Current Line (darker)
        foreground: Color::Rgb(0xf8, 0xf8, 0xf2), // Foreground
        muted: Color::Rgb(0x62, 0x72, 0xa4),      // Comment
        accent: Color::Rgb(0xff, 0x79, 0xc6),     // Pink
        card: Color::Rgb(0xbd, 0x93, 0xf9),       // Purple
        card_active: Color::Rgb(0xff, 0x79, 0xc6),
        shape: Color::Rgb(0x44, 0x47, 0x5a),      // Selection
        particle: Color::Rgb(0xf1, 0xfa, 0x8c),   // Yellow
        status_bg: Color::Rgb(0x44, 0x47, 0x5a),
        error: Color::Rgb(0xff, 0x55, 0x55),
        success: Color::Rgb(0x50, 0xfa, 0x7b),
    }
}
