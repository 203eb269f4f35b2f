//! The contract between the engine and whatever draws it.

use crate::backdrop::Backdrop;
use crate::camera::{CameraPose, Projection};
use crate::card::Card;
use crate::machine::{Cursor, PhaseKind};
use crate::page::{Section, Viewport};

/// Read-only view of one frame's final state.
#[derive(Debug, Clone, Copy)]
pub struct SceneFrame<'a> {
    pub frame_index: u64,
    pub time_ms: f64,
    pub phase: PhaseKind,
    pub camera: CameraPose,
    pub projection: Projection,
    pub viewport: Viewport,
    pub cards: &'a [Card],
    pub backdrop: &'a Backdrop,
    pub active_index: usize,
    pub hovered: Option<usize>,
    pub cursor: Cursor,
    pub cover_visible: bool,
    pub scroll_progress: f64,
    pub section: Section,
}

impl SceneFrame<'_> {
    /// Cards back to front, for painters that draw in order.
    pub fn cards_by_depth(&self) -> Vec<&Card> {
        let forward = self.camera.basis().forward;
        let mut cards: Vec<&Card> = self.cards.iter().collect();
        cards.sort_by(|a, b| {
            let da = (a.live.position - self.camera.position).dot(forward);
            let db = (b.live.position - self.camera.position).dot(forward);
            db.total_cmp(&da).then_with(|| a.index.cmp(&b.index))
        });
        cards
    }
}

/// Draws frames. Invoked once per tick after the state update.
pub trait RenderBridge {
    fn present(&mut self, frame: &SceneFrame<'_>) -> crate::Result<()>;

    /// Viewport size changed.
    fn resize(&mut self, _viewport: Viewport) -> crate::Result<()> {
        Ok(())
    }
}
