use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use folio_core::input::NavKey;

use crate::app::{App, Mode};
use crate::keymap::KeyBinding;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Explore,
    Home,
    NextCard,
    PrevCard,
    Open,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    Help,
    /// Arrow keys: carousel first, page scroll when the scene passes
    Arrow(NavKey),
    ExitMode,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
        return Action::Quit;
    }

    // Any key closes an overlay
    if app.mode != Mode::Normal {
        return Action::ExitMode;
    }

    app.keymap
        .get(&KeyBinding::from_event(&key))
        .copied()
        .unwrap_or(Action::None)
}
