mod page;
mod popup;
mod stage;
mod status_bar;

pub use page::PageWidget;
pub use popup::PopupWidget;
pub use stage::StageWidget;
pub use status_bar::StatusBarWidget;
