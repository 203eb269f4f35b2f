use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use folio_core::input::{NavKey, RawInput};
use folio_core::{AppConfig, ChoreographySession, Phase, Signal, WorkAction};
use tracing::{debug, warn};

use crate::bridge::{cell_to_viewport, stage_viewport, Overlay, Popup, ROW_UNITS};
use crate::input::Action;
use crate::keymap::Keymap;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Scene has the input
    Normal,
    /// Help overlay
    Help,
    /// Detail overlay for the card at this index
    Detail(usize),
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The scene being hosted
    pub session: ChoreographySession,
    /// Key to action lookup built from the config
    pub keymap: Keymap,
    /// Current application mode
    pub mode: Mode,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Links handed to the system opener; tests swap this out
    opener: fn(&str) -> std::io::Result<()>,
    started: Instant,
}

impl App {
    pub fn new(config: Arc<AppConfig>, session: ChoreographySession) -> Self {
        let keymap = Keymap::from_config(&config.keymap);
        Self {
            config,
            session,
            keymap,
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            opener: |url| open::that(url),
            started: Instant::now(),
        }
    }

    /// Milliseconds since the app started; the session's clock.
    pub fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Advance the scene by one frame
    pub fn tick(&mut self) {
        let now = self.now_ms();
        let report = self.session.tick(now);
        self.handle_signals(report.signals);
    }

    /// Terminal resized to `cols` x `rows` cells
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.session.resize(stage_viewport(cols, rows));
    }

    pub fn apply_action(&mut self, action: Action) {
        self.apply_action_at(action, self.now_ms());
    }

    pub fn apply_action_at(&mut self, action: Action, now_ms: f64) {
        let step = self.config.input.scroll_step_rows as f64;
        let signals = match action {
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Action::Explore => self.session.request_explore(now_ms),
            Action::Home => self.session.request_home(now_ms),
            Action::NextCard => self.carousel_step(1, now_ms),
            Action::PrevCard => self.carousel_step(-1, now_ms),
            Action::Open => self.session.activate_active(),
            Action::ScrollDown => self.scroll_rows(step),
            Action::ScrollUp => self.scroll_rows(-step),
            Action::PageDown => self.scroll_half_page(1.0),
            Action::PageUp => self.scroll_half_page(-1.0),
            Action::Help => {
                self.mode = Mode::Help;
                Vec::new()
            }
            Action::ExitMode => {
                self.mode = Mode::Normal;
                self.clear_status();
                Vec::new()
            }
            Action::Arrow(key) => {
                let outcome = self.session.key(key, now_ms);
                if !outcome.suppress_default {
                    match key {
                        NavKey::ArrowDown => {
                            self.scroll_rows(step);
                        }
                        NavKey::ArrowUp => {
                            self.scroll_rows(-step);
                        }
                        _ => {}
                    }
                }
                outcome.signals
            }
            Action::None => Vec::new(),
        };
        self.handle_signals(signals);
    }

    /// Route a terminal mouse event through the scene's input adapter
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        self.handle_mouse_at(mouse, self.now_ms());
    }

    pub fn handle_mouse_at(&mut self, mouse: MouseEvent, now_ms: f64) {
        if self.mode != Mode::Normal {
            return;
        }
        let Some((x, y)) = cell_to_viewport(mouse.column, mouse.row, self.session.viewport()) else {
            return;
        };

        let wheel = self.config.input.wheel_step;
        let (input, page_rows) = match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => (RawInput::PointerMove { x, y }, 0.0),
            MouseEventKind::Down(MouseButton::Left) => (RawInput::PointerClick { x, y }, 0.0),
            MouseEventKind::ScrollDown => (
                RawInput::Wheel { delta_x: 0.0, delta_y: wheel },
                self.config.input.scroll_step_rows as f64,
            ),
            MouseEventKind::ScrollUp => (
                RawInput::Wheel { delta_x: 0.0, delta_y: -wheel },
                -(self.config.input.scroll_step_rows as f64),
            ),
            MouseEventKind::ScrollRight => (RawInput::Wheel { delta_x: wheel, delta_y: 0.0 }, 0.0),
            MouseEventKind::ScrollLeft => (RawInput::Wheel { delta_x: -wheel, delta_y: 0.0 }, 0.0),
            _ => return,
        };

        let outcome = self.session.handle(input, now_ms);
        if !outcome.suppress_default && page_rows != 0.0 {
            self.scroll_rows(page_rows);
        }
        self.handle_signals(outcome.signals);
    }

    fn carousel_step(&mut self, direction: i8, now_ms: f64) -> Vec<Signal> {
        if self.session.phase() != Phase::Explore {
            debug!("Carousel step ignored outside explore");
            return Vec::new();
        }
        self.session.navigate(direction, now_ms)
    }

    fn scroll_rows(&mut self, rows: f64) -> Vec<Signal> {
        self.session.scroll_by(rows * ROW_UNITS);
        Vec::new()
    }

    fn scroll_half_page(&mut self, sign: f64) -> Vec<Signal> {
        let half = self.session.viewport().height * 0.5;
        self.session.scroll_by(sign * half);
        Vec::new()
    }

    /// React to scene signals
    pub fn handle_signals(&mut self, signals: Vec<Signal>) {
        for signal in signals {
            match signal {
                Signal::OpenWork { index, action } => self.open_work(index, action),
                Signal::EnteredExplore => self.set_status("Explore"),
                Signal::ReturnedHome => self.clear_status(),
                Signal::ActiveChanged { index, .. } => {
                    if let Some(card) = self.session.cards().get(index) {
                        let message = format!(
                            "{}/{} {}",
                            index + 1,
                            self.session.cards().len(),
                            card.work.title
                        );
                        self.set_status(message);
                    }
                }
                // Single-page host: the session replays the entrance itself
                Signal::NavigateToExplore => debug!("Explore page requested"),
                Signal::IntroFinished
                | Signal::CoverShown
                | Signal::CoverHidden
                | Signal::CursorChanged { .. } => {}
            }
        }
    }

    fn open_work(&mut self, index: usize, action: WorkAction) {
        match action {
            WorkAction::Link(url) => match (self.opener)(&url) {
                Ok(()) => self.set_status(format!("Opened: {}", url)),
                Err(e) => {
                    warn!("Failed to open {}: {}", url, e);
                    self.set_status(format!("Failed to open link: {}", e));
                }
            },
            WorkAction::Detail => self.mode = Mode::Detail(index),
        }
    }

    /// Host state for the render bridge
    pub fn overlay(&self) -> Overlay {
        let popup = match self.mode {
            Mode::Normal => None,
            Mode::Help => Some(Popup::Help(self.help_bindings())),
            Mode::Detail(index) => self
                .session
                .cards()
                .get(index)
                .map(|card| Popup::Detail(card.work.clone())),
        };
        Overlay {
            status_message: self.status_message.clone(),
            popup,
        }
    }

    fn help_bindings(&self) -> Vec<(String, &'static str)> {
        let keys = &self.config.keymap;
        vec![
            (keys.explore.clone(), "Enter explore carousel"),
            (keys.home.clone(), "Back to home"),
            (keys.next_card.clone(), "Next card"),
            (keys.prev_card.clone(), "Previous card"),
            ("←/→".to_string(), "Browse cards"),
            (keys.open.clone(), "Open focused card"),
            (keys.scroll_down.clone(), "Scroll down"),
            (keys.scroll_up.clone(), "Scroll up"),
            (keys.page_down.clone(), "Half page down"),
            (keys.page_up.clone(), "Half page up"),
            (keys.help.clone(), "This help"),
            (keys.quit.clone(), "Quit"),
        ]
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::handle_key_event;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use folio_core::works::{builtin_works, WorkDetail};
    use folio_core::{PortfolioWork, StartPage};

    fn app_with(works: Vec<PortfolioWork>, start: StartPage) -> App {
        let config = Arc::new(AppConfig::default());
        let session = ChoreographySession::create(&config, works, start, 0.0);
        let mut app = App::new(config, session);
        app.opener = |_| Ok(());
        app.resize(80, 25);
        app
    }

    fn app(start: StartPage) -> App {
        app_with(builtin_works(), start)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_explore_key_starts_transition() {
        let mut app = app(StartPage::Home);
        let action = handle_key_event(key(KeyCode::Char('e')), &app);
        assert_eq!(action, Action::Explore);

        app.apply_action_at(action, 10.0);
        assert!(app.session.phase().is_transitioning());
    }

    #[test]
    fn test_help_overlay_closes_on_any_key() {
        let mut app = app(StartPage::Home);
        app.apply_action_at(Action::Help, 0.0);
        assert_eq!(app.mode, Mode::Help);
        assert!(matches!(app.overlay().popup, Some(Popup::Help(_))));

        let action = handle_key_event(key(KeyCode::Char('x')), &app);
        assert_eq!(action, Action::ExitMode);
        app.apply_action_at(action, 0.0);
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.overlay().popup.is_none());
    }

    #[test]
    fn test_ctrl_c_quits_from_overlay() {
        let mut app = app(StartPage::Home);
        app.mode = Mode::Help;
        let action = handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &app);
        assert_eq!(action, Action::Quit);
        app.apply_action_at(action, 0.0);
        assert!(app.should_quit);
    }

    #[test]
    fn test_arrow_scrolls_page_at_home() {
        let mut app = app(StartPage::Home);
        app.apply_action_at(Action::Arrow(NavKey::ArrowDown), 0.0);
        let expected = app.config.input.scroll_step_rows as f64 * ROW_UNITS;
        assert!((app.session.page().scroll_y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_does_not_scroll_page_in_explore() {
        let mut app = app(StartPage::Explore);
        app.apply_action_at(Action::Arrow(NavKey::ArrowDown), 0.0);
        assert_eq!(app.session.page().scroll_y, 0.0);
    }

    #[test]
    fn test_wheel_scrolls_page_only_at_home() {
        let mut home = app(StartPage::Home);
        home.handle_mouse_at(mouse(MouseEventKind::ScrollDown, 10, 10), 0.0);
        assert!(home.session.page().scroll_y > 0.0);

        let mut explore = app(StartPage::Explore);
        explore.handle_mouse_at(mouse(MouseEventKind::ScrollDown, 10, 10), 0.0);
        assert_eq!(explore.session.page().scroll_y, 0.0);
    }

    #[test]
    fn test_mouse_on_status_row_ignored() {
        let mut app = app(StartPage::Home);
        app.handle_mouse_at(mouse(MouseEventKind::ScrollDown, 10, 24), 0.0);
        assert_eq!(app.session.page().scroll_y, 0.0);
    }

    #[test]
    fn test_carousel_step_ignored_at_home() {
        let mut app = app(StartPage::Home);
        app.apply_action_at(Action::NextCard, 0.0);
        assert_eq!(app.session.state().active_index, 0);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_detail_signal_opens_popup() {
        let mut work = PortfolioWork::new("Orbit", "Satellite dashboard", "orbit.png");
        work.detail = Some(WorkDetail {
            role: Some("Lead".to_string()),
            year: Some(2024),
            tags: vec!["webgl".to_string()],
            summary: None,
        });
        let mut app = app_with(vec![work], StartPage::Home);

        app.handle_signals(vec![Signal::OpenWork {
            index: 0,
            action: WorkAction::Detail,
        }]);
        assert_eq!(app.mode, Mode::Detail(0));
        match app.overlay().popup {
            Some(Popup::Detail(work)) => assert_eq!(work.title, "Orbit"),
            other => panic!("unexpected popup: {:?}", other),
        }
    }

    #[test]
    fn test_link_signal_sets_status() {
        let mut app = app(StartPage::Home);
        app.handle_signals(vec![Signal::OpenWork {
            index: 0,
            action: WorkAction::Link("https://example.com/alpha".to_string()),
        }]);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Opened: https://example.com/alpha")
        );
    }

    #[test]
    fn test_link_open_failure_reported() {
        let mut app = app(StartPage::Home);
        app.opener = |_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no opener"));
        app.handle_signals(vec![Signal::OpenWork {
            index: 0,
            action: WorkAction::Link("https://example.com/alpha".to_string()),
        }]);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Failed to open link: no opener")
        );
    }
}
