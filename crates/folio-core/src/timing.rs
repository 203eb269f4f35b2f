//! Time and interpolation helpers shared by the animation driver.
//!
//! All timestamps are milliseconds on the host's monotonic clock.

/// Animation progress clamped to `[0, 1]`.
///
/// A non-positive duration jumps from 0 to 1 at `start_ms`.
#[inline]
pub fn progress(start_ms: f64, duration_ms: f64, now_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return if now_ms >= start_ms { 1.0 } else { 0.0 };
    }
    ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// One step of an exponential approach: move `factor` of the remaining gap.
#[inline]
pub fn approach(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// `approach`, snapping onto the target once within `epsilon` of it.
#[inline]
pub fn settle(current: f64, target: f64, factor: f64, epsilon: f64) -> f64 {
    let next = approach(current, target, factor);
    if (target - next).abs() <= epsilon {
        target
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_clamps() {
        assert_eq!(progress(100.0, 1000.0, 50.0), 0.0);
        assert!((progress(100.0, 1000.0, 600.0) - 0.5).abs() < 1e-12);
        assert_eq!(progress(100.0, 1000.0, 5000.0), 1.0);
        assert_eq!(progress(100.0, 1000.0, 1100.0), 1.0);
        assert!(progress(100.0, 1000.0, 1099.0) < 1.0);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert_eq!(progress(10.0, 0.0, 9.0), 0.0);
        assert_eq!(progress(10.0, 0.0, 10.0), 1.0);
        assert_eq!(progress(10.0, -5.0, 11.0), 1.0);
    }

    #[test]
    fn test_settle_reaches_target_exactly() {
        let mut v = 0.0;
        let mut frames = 0;
        while v != 1.0 {
            v = settle(v, 1.0, 0.18, 1e-4);
            frames += 1;
            assert!(frames < 200, "never settled");
        }
        assert_eq!(v, 1.0);
    }

    #[test]
    fn test_approach_never_overshoots() {
        let mut v = 10.0;
        for _ in 0..100 {
            v = approach(v, 2.0, 0.22);
            assert!(v >= 2.0);
        }
    }
}
