pub mod app;
pub mod bridge;
pub mod event;
pub mod input;
pub mod keymap;
pub mod theme;
pub mod themes;
pub mod widgets;

pub use app::App;
pub use bridge::TerminalBridge;
pub use theme::Theme;
pub use themes::load_theme;
