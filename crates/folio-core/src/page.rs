//! Host page geometry: viewport size and scroll position.

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Normalized device coordinates for a pixel position (y up).
    pub fn to_ndc(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.width * 2.0 - 1.0, -(y / self.height) * 2.0 + 1.0)
    }
}

/// Page section the viewport top currently sits in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hero,
    Portfolio,
    Contact,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Hero => "Hero",
            Section::Portfolio => "Portfolio",
            Section::Contact => "Contact",
        }
    }
}

/// Vertical page scroll in the same units as the viewport height.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PageScroll {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl PageScroll {
    pub fn new(viewport_height: f64, screens: f64) -> Self {
        let viewport_height = viewport_height.max(1.0);
        Self {
            scroll_y: 0.0,
            viewport_height,
            content_height: viewport_height * screens.max(1.0),
        }
    }

    pub fn scrollable(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Scroll fraction; the range never drops below 1 so an unscrollable page stays at 0.
    pub fn progress(&self) -> f64 {
        self.scroll_y / self.scrollable().max(1.0)
    }

    pub fn set(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y.clamp(0.0, self.scrollable());
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.set(self.scroll_y + delta);
    }

    /// Keep the scroll fraction across a viewport change.
    pub fn resize(&mut self, viewport_height: f64, screens: f64) {
        let fraction = self.progress();
        let viewport_height = viewport_height.max(1.0);
        self.viewport_height = viewport_height;
        self.content_height = viewport_height * screens.max(1.0);
        self.set(fraction * self.scrollable());
    }

    pub fn section(&self) -> Section {
        match (self.scroll_y / self.viewport_height).floor() as i64 {
            i64::MIN..=0 => Section::Hero,
            1 => Section::Portfolio,
            _ => Section::Contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let vp = Viewport::new(200.0, 100.0);
        assert_eq!(vp.to_ndc(0.0, 0.0), (-1.0, 1.0));
        assert_eq!(vp.to_ndc(200.0, 100.0), (1.0, -1.0));
        assert_eq!(vp.to_ndc(100.0, 50.0), (0.0, 0.0));
        assert_eq!(vp.aspect(), 2.0);
    }

    #[test]
    fn progress_and_sections() {
        let mut page = PageScroll::new(100.0, 3.0);
        assert_eq!(page.progress(), 0.0);
        assert_eq!(page.section(), Section::Hero);

        page.set(100.0);
        assert_eq!(page.progress(), 0.5);
        assert_eq!(page.section(), Section::Portfolio);

        page.scroll_by(1000.0);
        assert_eq!(page.scroll_y, 200.0);
        assert_eq!(page.progress(), 1.0);
        assert_eq!(page.section(), Section::Contact);

        page.scroll_by(-1000.0);
        assert_eq!(page.scroll_y, 0.0);
    }

    #[test]
    fn unscrollable_page_stays_at_zero() {
        let page = PageScroll::new(100.0, 1.0);
        assert_eq!(page.scrollable(), 0.0);
        assert_eq!(page.progress(), 0.0);
    }

    #[test]
    fn resize_keeps_fraction() {
        let mut page = PageScroll::new(100.0, 3.0);
        page.set(50.0);
        page.resize(40.0, 3.0);
        assert!((page.progress() - 0.25).abs() < 1e-12);
    }
}
