use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Page colors
    pub background: Color,
    pub surface: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,

    // Scene colors
    pub card: Color,
    pub card_active: Color,
    pub shape: Color,
    pub particle: Color,

    // Chrome
    pub status_bg: Color,
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Midnight: dark page, pink and blue scene lights, yellow dust
        Self {
            background: Color::Rgb(0x0b, 0x0d, 0x17),
            surface: Color::Rgb(0x16, 0x19, 0x2b),
            foreground: Color::Rgb(0xe8, 0xe8, 0xf0),
            muted: Color::Rgb(0x6c, 0x70, 0x8a),
            accent: Color::Rgb(0xff, 0x00, 0x6e),
            card: Color::Rgb(0x3a, 0x86, 0xff),
            card_active: Color::Rgb(0xff, 0x00, 0x6e),
            shape: Color::Rgb(0x5b, 0x61, 0x8a),
            particle: Color::Rgb(0xff, 0xff, 0x00),
            status_bg: Color::Rgb(0x23, 0x30, 0x44),
            error: Color::Rgb(0xea, 0x69, 0x62),
            success: Color::Rgb(0xa9, 0xb6, 0x65),
        }
    }
}

impl Theme {
    /// Blend `color` toward the background by `opacity` (0 = invisible).
    pub fn fade(&self, color: Color, opacity: f64) -> Color {
        match (color, self.background) {
            (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
                let t = opacity.clamp(0.0, 1.0);
                let mix = |c: u8, base: u8| (base as f64 + (c as f64 - base as f64) * t).round() as u8;
                Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
            }
            _ => color,
        }
    }
}
