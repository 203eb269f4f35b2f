pub mod backdrop;
pub mod bridge;
pub mod camera;
pub mod card;
pub mod config;
pub mod driver;
pub mod easing;
pub mod error;
pub mod input;
pub mod layout;
pub mod machine;
pub mod math;
pub mod page;
pub mod picking;
pub mod session;
pub mod timing;
pub mod works;

pub use bridge::{RenderBridge, SceneFrame};
pub use config::{AppConfig, Easing};
pub use error::{Error, Result};
pub use machine::{Cursor, Phase, PhaseKind, Signal};
pub use session::{ChoreographySession, FrameReport, StartPage};
pub use works::{PortfolioWork, WorkAction};
