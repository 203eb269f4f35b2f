//! Carousel line arrangement.

use crate::card::{Card, LineState};
use crate::config::LayoutConfig;
use crate::math::{Euler, Vec3};

#[derive(Debug, Clone)]
pub struct LayoutPlanner {
    config: LayoutConfig,
}

impl LayoutPlanner {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Signed distance from `index` to `active`, wrapped to the shorter path.
    /// An exact half-turn resolves in the direction of the last gesture.
    pub fn wrapped_offset(index: usize, active: usize, count: usize, direction: i8) -> i64 {
        if count == 0 {
            return 0;
        }
        let count_i = count as i64;
        let half = count as f64 / 2.0;
        let mut offset = index as i64 - active as i64;
        let as_f = offset as f64;
        if as_f > half || (as_f == half && direction > 0) {
            offset -= count_i;
        } else if as_f < -half || (as_f == -half && direction < 0) {
            offset += count_i;
        }
        offset
    }

    pub fn line_state(&self, offset: i64) -> LineState {
        let active = offset == 0;
        LineState {
            position: Vec3::new(offset as f64 * self.config.spacing, 0.0, self.config.depth),
            rotation: Euler::IDENTITY,
            scale: if active {
                self.config.active_scale
            } else {
                self.config.idle_scale
            },
            opacity: if active {
                self.config.active_opacity
            } else {
                self.config.idle_opacity
            },
        }
    }

    /// Assign every card its line-state. No-op for an empty sequence.
    pub fn plan(&self, cards: &mut [Card], active: usize, direction: i8) {
        let count = cards.len();
        if count == 0 {
            return;
        }
        for card in cards.iter_mut() {
            let offset = Self::wrapped_offset(card.index, active, count, direction);
            card.line = self.line_state(offset);
        }
    }
}
