//! Nord theme
//! https://www.nordtheme.com/

use ratatui::style::Color;
use crate::theme::Theme;

/// Nord default theme
pub fn default() -> Theme {
    Theme {
        // Polar Night
        background: Color::Rgb(0x2e, 0x34, 0x40), // nord0
        surface: Color::Rgb(0x3b, 0x42, 0x52),    // nord1
        // Snow Storm
        foreground: Color::Rgb(0xec, 0xef, 0xf4), // nord6
        muted: Color::Rgb(0x5e, 0x68, 0x7a),      // nord3 lighter
        // Frost
        accent: Color::Rgb(0x88, 0xc0, 0xd0),     // nord8
        card: Color::Rgb(0x81, 0xa1, 0xc1),       // nord9
        card_active: Color::Rgb(0x8f, 0xbc, 0xbb), // nord7
        shape: Color::Rgb(0x4c, 0x56, 0x6a),      // nord3
        // Aurora
        particle: Color::Rgb(0xeb, 0xcb, 0x8b),   // nord13
        status_bg: Color::Rgb(0x43, 0x4c, 0x5e),  // nord2
        error: Color::Rgb(0xbf, 0x61, 0x6a),      // nord11
        success: Color::Rgb(0xa3, 0xbe, 0x8c),    // nord14
    }
}
