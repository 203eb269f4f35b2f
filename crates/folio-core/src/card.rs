//! Strongly typed card records.

use serde::Serialize;

use crate::math::{Euler, Vec3};
use crate::works::PortfolioWork;

/// Card plane width in world units at scale 1.
pub const CARD_WIDTH: f64 = 1.5;
/// Card plane height in world units at scale 1.
pub const CARD_HEIGHT: f64 = 2.5;

/// Position, rotation and uniform scale.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Euler::IDENTITY,
            scale: 1.0,
        }
    }
}

/// A transform plus opacity: what the renderer needs for one card.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: f64,
    pub opacity: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_transform(Transform::default(), 1.0)
    }
}

impl Pose {
    pub fn from_transform(t: Transform, opacity: f64) -> Self {
        Self {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
            opacity,
        }
    }

    pub fn lerp(&self, to: &Pose, t: f64) -> Pose {
        Pose {
            position: self.position.lerp(to.position, t),
            rotation: self.rotation.lerp(to.rotation, t),
            scale: self.scale + (to.scale - self.scale) * t,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }

    /// World-space corners, counter-clockwise from bottom-left.
    pub fn corners(&self) -> [Vec3; 4] {
        let m = self.rotation.matrix();
        let hw = CARD_WIDTH * 0.5 * self.scale;
        let hh = CARD_HEIGHT * 0.5 * self.scale;
        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .map(|(x, y)| self.position + m.mul_vec(Vec3::new(x, y, 0.0)))
    }
}

/// Target state assigned by the layout planner.
pub type LineState = Pose;

/// One portfolio entry in the scene.
#[derive(Debug, Clone)]
pub struct Card {
    pub index: usize,
    pub work: PortfolioWork,
    /// Home placement; floating motion oscillates around it.
    pub original: Transform,
    pub line: LineState,
    /// Captured at the start of a mode transition.
    pub transition_start: Option<Pose>,
    /// Off-screen pose the entrance animation starts from.
    pub intro_start: Option<Pose>,
    pub intro_delay_ms: f64,
    pub hovered: bool,
    pub live: Pose,
}

impl Card {
    pub fn new(index: usize, work: PortfolioWork, original: Transform) -> Self {
        let live = Pose::from_transform(original, 1.0);
        Self {
            index,
            work,
            original,
            line: live,
            transition_start: None,
            intro_start: None,
            intro_delay_ms: 0.0,
            hovered: false,
            live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_lerp_endpoints() {
        let a = Pose::default();
        let b = Pose {
            position: Vec3::new(2.0, -1.0, 4.0),
            rotation: Euler::new(0.5, 0.0, -0.5),
            scale: 2.0,
            opacity: 0.0,
        };
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.scale, 1.5);
        assert_eq!(mid.opacity, 0.5);
    }

    #[test]
    fn corners_span_card_size() {
        let pose = Pose {
            scale: 2.0,
            ..Pose::default()
        };
        let c = pose.corners();
        assert!(((c[1].x - c[0].x) - CARD_WIDTH * 2.0).abs() < 1e-12);
        assert!(((c[3].y - c[0].y) - CARD_HEIGHT * 2.0).abs() < 1e-12);
    }
}
