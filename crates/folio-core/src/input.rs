//! Raw pointer/wheel/keyboard events to discrete intents.
//!
//! The adapter only filters by magnitude; cooldown and the transition lock
//! live in the state machine.

use serde::Deserialize;

use crate::camera::{CameraPose, Projection};
use crate::card::Card;
use crate::machine::Signal;
use crate::page::Viewport;
use crate::picking::{pick_cards, PickHit};

/// Keys the carousel understands
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other,
}

/// Host-neutral input event in viewport pixels
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawInput {
    PointerMove { x: f64, y: f64 },
    PointerClick { x: f64, y: f64 },
    Wheel { delta_x: f64, delta_y: f64 },
    Key { key: NavKey },
}

/// What the host should do with the original event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputOutcome {
    /// The carousel consumed it; skip default scrolling
    pub suppress_default: bool,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone)]
pub struct InputAdapter {
    noise_floor: f64,
}

impl InputAdapter {
    pub fn new(noise_floor: f64) -> Self {
        Self { noise_floor }
    }

    /// Unit navigation direction from a wheel event, using the dominant axis.
    pub fn wheel_direction(&self, delta_x: f64, delta_y: f64) -> Option<i8> {
        let delta = if delta_y.abs() > delta_x.abs() { delta_y } else { delta_x };
        if !delta.is_finite() || delta.abs() < self.noise_floor {
            return None;
        }
        Some(if delta > 0.0 { 1 } else { -1 })
    }

    pub fn key_direction(key: NavKey) -> Option<i8> {
        match key {
            NavKey::ArrowRight | NavKey::ArrowDown => Some(1),
            NavKey::ArrowLeft | NavKey::ArrowUp => Some(-1),
            NavKey::Other => None,
        }
    }

    /// Nearest card under the pointer.
    pub fn pick(
        &self,
        cards: &[Card],
        camera: &CameraPose,
        projection: &Projection,
        viewport: &Viewport,
        x: f64,
        y: f64,
    ) -> Option<PickHit> {
        let (ndc_x, ndc_y) = viewport.to_ndc(x, y);
        pick_cards(cards, projection.ray(camera, ndc_x, ndc_y))
    }

    /// Mark at most one card hovered. Returns the hovered index.
    pub fn update_hover(cards: &mut [Card], hit: Option<&PickHit>) -> Option<usize> {
        let hovered = hit.map(|h| h.index);
        for card in cards.iter_mut() {
            card.hovered = Some(card.index) == hovered;
        }
        hovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Pose, Transform};
    use crate::math::Vec3;
    use crate::works::PortfolioWork;

    #[test]
    fn wheel_uses_dominant_axis() {
        let adapter = InputAdapter::new(5.0);
        assert_eq!(adapter.wheel_direction(0.0, 40.0), Some(1));
        assert_eq!(adapter.wheel_direction(-30.0, 10.0), Some(-1));
        assert_eq!(adapter.wheel_direction(12.0, -3.0), Some(1));
    }

    #[test]
    fn wheel_noise_floor() {
        let adapter = InputAdapter::new(5.0);
        assert_eq!(adapter.wheel_direction(0.0, 4.9), None);
        assert_eq!(adapter.wheel_direction(0.0, -5.0), Some(-1));
        assert_eq!(adapter.wheel_direction(f64::NAN, 0.0), None);
    }

    #[test]
    fn arrow_keys() {
        assert_eq!(InputAdapter::key_direction(NavKey::ArrowDown), Some(1));
        assert_eq!(InputAdapter::key_direction(NavKey::ArrowUp), Some(-1));
        assert_eq!(InputAdapter::key_direction(NavKey::Other), None);
    }

    #[test]
    fn hover_marks_single_card() {
        let viewport = Viewport::new(800.0, 600.0);
        let projection = Projection::default().with_aspect(viewport.aspect());
        let camera = CameraPose::default();
        let mut cards: Vec<Card> = (0..3)
            .map(|i| {
                let mut card = Card::new(i, PortfolioWork::placeholder(i + 1, "#2b2d42"), Transform::default());
                card.live = Pose {
                    position: Vec3::new(i as f64 * 3.0 - 3.0, 0.0, 0.0),
                    ..Pose::default()
                };
                card.hovered = true;
                card
            })
            .collect();

        let adapter = InputAdapter::new(5.0);
        let hit = adapter.pick(&cards, &camera, &projection, &viewport, 400.0, 300.0);
        assert_eq!(InputAdapter::update_hover(&mut cards, hit.as_ref()), Some(1));
        assert_eq!(cards.iter().filter(|c| c.hovered).count(), 1);
        assert!(cards[1].hovered);

        let miss = adapter.pick(&cards, &camera, &projection, &viewport, 0.0, 0.0);
        assert_eq!(InputAdapter::update_hover(&mut cards, miss.as_ref()), None);
        assert!(cards.iter().all(|c| !c.hovered));
    }
}
