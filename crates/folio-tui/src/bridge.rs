use folio_core::page::Viewport;
use folio_core::works::PortfolioWork;
use folio_core::{PhaseKind, RenderBridge, SceneFrame};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout};
use ratatui::Terminal;

use crate::theme::Theme;
use crate::widgets::{PageWidget, PopupWidget, StageWidget, StatusBarWidget};

/// Rows reserved below the stage for the status bar
pub const STATUS_ROWS: u16 = 1;

/// Viewport units per terminal row. Cells are roughly twice as tall as wide.
pub const ROW_UNITS: f64 = 2.0;

/// Scene viewport for a terminal of `cols` x `rows` cells.
pub fn stage_viewport(cols: u16, rows: u16) -> Viewport {
    let rows = rows.saturating_sub(STATUS_ROWS).max(1);
    Viewport::new(cols.max(1) as f64, rows as f64 * ROW_UNITS)
}

/// Centre of a terminal cell in viewport units; `None` outside the stage.
pub fn cell_to_viewport(col: u16, row: u16, viewport: Viewport) -> Option<(f64, f64)> {
    let x = col as f64 + 0.5;
    let y = (row as f64 + 0.5) * ROW_UNITS;
    if x > viewport.width || y > viewport.height {
        return None;
    }
    Some((x, y))
}

/// Modal content drawn over the stage
#[derive(Debug, Clone)]
pub enum Popup {
    /// Key binding and description pairs
    Help(Vec<(String, &'static str)>),
    Detail(PortfolioWork),
}

/// Host state the scene frame does not carry
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pub status_message: Option<String>,
    pub popup: Option<Popup>,
}

/// Render bridge that draws scene frames into a ratatui terminal
pub struct TerminalBridge<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
    overlay: Overlay,
    show_particles: bool,
}

impl<B: Backend> TerminalBridge<B> {
    pub fn new(terminal: Terminal<B>, theme: Theme, show_particles: bool) -> Self {
        Self {
            terminal,
            theme,
            overlay: Overlay::default(),
            show_particles,
        }
    }

    pub fn set_overlay(&mut self, overlay: Overlay) {
        self.overlay = overlay;
    }

    /// Current stage viewport derived from the terminal size
    pub fn viewport(&self) -> folio_core::Result<Viewport> {
        let size = self.terminal.size()?;
        Ok(stage_viewport(size.width, size.height))
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> RenderBridge for TerminalBridge<B> {
    fn present(&mut self, scene: &SceneFrame<'_>) -> folio_core::Result<()> {
        let theme = &self.theme;
        let overlay = &self.overlay;
        let show_particles = self.show_particles;

        self.terminal.draw(|frame| {
            let [stage, status] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(STATUS_ROWS)])
                    .areas(frame.area());

            StageWidget::render(frame, stage, scene, theme, show_particles);
            if scene.phase == PhaseKind::Home {
                PageWidget::render(frame, stage, scene, theme);
            }
            if scene.cover_visible {
                PageWidget::render_cover(frame, stage, theme);
            }
            StatusBarWidget::render(frame, status, scene, overlay.status_message.as_deref(), theme);

            match &overlay.popup {
                Some(Popup::Help(bindings)) => PopupWidget::render_help(frame, bindings, theme),
                Some(Popup::Detail(work)) => PopupWidget::render_detail(frame, work, theme),
                None => {}
            }
        })?;
        Ok(())
    }

    fn resize(&mut self, _viewport: Viewport) -> folio_core::Result<()> {
        self.terminal.autoresize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::config::AppConfig;
    use folio_core::works::builtin_works;
    use folio_core::{ChoreographySession, StartPage};
    use ratatui::backend::TestBackend;

    #[test]
    fn test_stage_viewport_excludes_status_row() {
        let viewport = stage_viewport(80, 25);
        assert_eq!(viewport.width, 80.0);
        assert_eq!(viewport.height, 48.0);
    }

    #[test]
    fn test_cell_to_viewport() {
        let viewport = stage_viewport(80, 25);
        assert_eq!(cell_to_viewport(0, 0, viewport), Some((0.5, 1.0)));
        assert_eq!(cell_to_viewport(79, 23, viewport), Some((79.5, 47.0)));
        // Status bar row
        assert_eq!(cell_to_viewport(10, 24, viewport), None);
    }

    fn buffer_text(bridge: &mut TerminalBridge<TestBackend>) -> String {
        let buffer = bridge.terminal_mut().backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_present_draws_status_bar() {
        let terminal = Terminal::new(TestBackend::new(80, 25)).unwrap();
        let mut bridge = TerminalBridge::new(terminal, Theme::default(), false);
        let mut session =
            ChoreographySession::create(&AppConfig::default(), builtin_works(), StartPage::Home, 0.0);
        session.resize(bridge.viewport().unwrap());
        session.tick(16.0);

        bridge.present(&session.snapshot()).unwrap();
        let text = buffer_text(&mut bridge);
        assert!(text.contains("HOME"));
        assert!(text.contains("Hero"));
        assert!(text.contains("FOLIO"));
    }

    #[test]
    fn test_present_draws_cover_during_intro() {
        let terminal = Terminal::new(TestBackend::new(80, 25)).unwrap();
        let mut bridge = TerminalBridge::new(terminal, Theme::default(), false);
        let session =
            ChoreographySession::create(&AppConfig::default(), builtin_works(), StartPage::Explore, 0.0);
        assert!(session.snapshot().cover_visible);

        bridge.present(&session.snapshot()).unwrap();
        let text = buffer_text(&mut bridge);
        assert!(text.contains("ENTERING"));
        assert!(text.contains("F O L I O"));
    }

    #[test]
    fn test_present_draws_popup() {
        let terminal = Terminal::new(TestBackend::new(80, 25)).unwrap();
        let mut bridge = TerminalBridge::new(terminal, Theme::default(), false);
        let session =
            ChoreographySession::create(&AppConfig::default(), builtin_works(), StartPage::Home, 0.0);

        let work = PortfolioWork::new("Orbit", "Satellite dashboard", "orbit.png");
        bridge.set_overlay(Overlay {
            status_message: Some("Opened detail".to_string()),
            popup: Some(Popup::Detail(work)),
        });
        bridge.present(&session.snapshot()).unwrap();
        let text = buffer_text(&mut bridge);
        assert!(text.contains("Orbit"));
        assert!(text.contains("Opened detail"));
    }
}
