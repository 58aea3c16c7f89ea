//! Interpolation curves for motion and zoom timing

/// Linear interpolation between `a` and `b` at `t` in [0, 1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic ease-out: fast start, decelerating finish.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Cubic ease-in-out: slow start and finish, fast middle.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// Normalized progress of `frame` within a phase of `total` frames.
///
/// Returns 1.0 on the last frame so phases land exactly on their target.
pub fn phase_t(frame: u32, total: u32) -> f32 {
    if total <= 1 {
        return 1.0;
    }
    frame as f32 / (total - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn ease_out_is_monotone() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = ease_out_cubic(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn ease_in_out_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }

    #[test]
    fn phase_t_covers_the_full_range() {
        assert_eq!(phase_t(0, 10), 0.0);
        assert_eq!(phase_t(9, 10), 1.0);
        assert_eq!(phase_t(0, 1), 1.0);
    }
}
