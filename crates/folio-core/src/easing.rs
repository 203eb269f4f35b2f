//! Pure easing functions mapping normalized progress to eased progress.
//!
//! The free functions do not clamp; callers clamp progress first. `Easing::apply`
//! clamps for convenience.

use crate::config::Easing;

/// Cubic ease-in-out: `4t³` below the midpoint, `1 - (-2t + 2)³ / 2` above.
#[inline]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// Quintic ease-out: `1 - (1 - t)⁵`. Fast start, slow settle.
#[inline]
pub fn ease_out_quint(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

impl Easing {
    /// Apply the easing curve to a progress value, clamping it to `[0, 1]`.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::InOutCubic => ease_in_out_cubic(t),
            Easing::OutQuint => ease_out_quint(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_out_cubic_fixed_points() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }

    #[test]
    fn out_quint_fixed_points() {
        assert_eq!(ease_out_quint(0.0), 0.0);
        assert_eq!(ease_out_quint(1.0), 1.0);
    }

    #[test]
    fn easing_monotonic() {
        for easing in [Easing::Linear, Easing::InOutCubic, Easing::OutQuint] {
            let mut prev = 0.0;
            for i in 0..=1000 {
                let t = i as f64 / 1000.0;
                let v = easing.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn in_out_cubic_is_symmetric_and_smooth_at_midpoint() {
        for i in 0..=50 {
            let t = i as f64 / 100.0;
            let sum = ease_in_out_cubic(t) + ease_in_out_cubic(1.0 - t);
            assert!((sum - 1.0).abs() < 1e-12, "asymmetric at t={}", t);
        }

        let h = 1e-6;
        let left = (ease_in_out_cubic(0.5) - ease_in_out_cubic(0.5 - h)) / h;
        let right = (ease_in_out_cubic(0.5 + h) - ease_in_out_cubic(0.5)) / h;
        assert!((left - right).abs() < 1e-3);
    }

    #[test]
    fn out_quint_starts_steep_and_flattens() {
        let h = 1e-6;
        let start_slope = ease_out_quint(h) / h;
        let end_slope = (1.0 - ease_out_quint(1.0 - h)) / h;
        assert!((start_slope - 5.0).abs() < 1e-3);
        assert!(end_slope < 1e-3);
    }

    #[test]
    fn apply_clamps_out_of_range_progress() {
        assert_eq!(Easing::InOutCubic.apply(-0.5), 0.0);
        assert_eq!(Easing::OutQuint.apply(1.5), 1.0);
    }
}
