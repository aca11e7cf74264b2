//! Timing curves for keyframed tracks.
//!
//! Provided:
//! - `KeySpline` : cubic-bezier timing curve `(x1 y1 x2 y2)` as used by SMIL `keySplines`
//! - `EASE_*`    : the named curves used by the bar animations
//!
//! Each spline maps segment progress `t ∈ [0,1]` to eased progress. The
//! evaluator exists so tracks can be sampled at an arbitrary time (tests,
//! glitch layering resolution); the markup carries the raw control points.

use core::fmt;

use crate::math::{clamp, push_num};

/// Cubic-bezier timing curve with fixed end points (0,0) and (1,1).
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeySpline {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Symmetric ease-in-out.
pub const EASE_IN_OUT: KeySpline = KeySpline::new(0.4, 0.0, 0.2, 1.0);
/// Slow start, sudden finish.
pub const EASE_IN_SHARP: KeySpline = KeySpline::new(0.7, 0.0, 0.84, 0.0);
/// Sudden start, long settle.
pub const EASE_OUT_SNAP: KeySpline = KeySpline::new(0.16, 1.0, 0.3, 1.0);
/// Gentle sine-like segment.
pub const EASE_SINE: KeySpline = KeySpline::new(0.45, 0.0, 0.55, 1.0);
/// Straight line.
pub const LINEAR: KeySpline = KeySpline::new(0.0, 0.0, 1.0, 1.0);

impl KeySpline {
    /// Control-point `x` values must lie in `[0,1]` so the curve stays a function of time.
    #[inline]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Same as [`KeySpline::new`] but clamps `x1`/`x2` into `[0,1]`.
    #[inline]
    pub fn clamped(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(clamp(x1, 0.0, 1.0), y1, clamp(x2, 0.0, 1.0), y2)
    }

    #[inline]
    fn bezier(p1: f64, p2: f64, s: f64) -> f64 {
        // B(s) = 3(1-s)^2 s p1 + 3(1-s) s^2 p2 + s^3
        let u = 1.0 - s;
        3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
    }

    #[inline]
    fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
        let u = 1.0 - s;
        3.0 * u * u * p1 + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    /// Solve `x(s) = t` for the curve parameter `s`.
    fn solve_s(&self, t: f64) -> f64 {
        // Newton first, bisection as the fallback for flat slopes.
        let mut s = t;
        for _ in 0..8 {
            let err = Self::bezier(self.x1, self.x2, s) - t;
            if err.abs() < 1e-9 {
                return s;
            }
            let d = Self::bezier_slope(self.x1, self.x2, s);
            if d.abs() < 1e-9 {
                break;
            }
            s = clamp(s - err / d, 0.0, 1.0);
        }
        let (mut lo, mut hi) = (0.0, 1.0);
        s = t;
        for _ in 0..48 {
            let x = Self::bezier(self.x1, self.x2, s);
            if (x - t).abs() < 1e-9 {
                break;
            }
            if x < t { lo = s; } else { hi = s; }
            s = 0.5 * (lo + hi);
        }
        s
    }

    /// Eased progress for linear progress `t` (clamped to `[0,1]`).
    pub fn ease(&self, t: f64) -> f64 {
        let t = clamp(t, 0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        Self::bezier(self.y1, self.y2, self.solve_s(t))
    }

    /// Append the `x1 y1 x2 y2` rendering used in `keySplines`.
    pub fn push_markup(&self, out: &mut String) {
        for (i, v) in [self.x1, self.y1, self.x2, self.y2].into_iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            push_num(out, v);
        }
    }
}

impl fmt::Display for KeySpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::with_capacity(16);
        self.push_markup(&mut s);
        f.write_str(&s)
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for c in [EASE_IN_OUT, EASE_IN_SHARP, EASE_OUT_SNAP, EASE_SINE, LINEAR] {
            assert_eq!(c.ease(0.0), 0.0);
            assert_eq!(c.ease(1.0), 1.0);
        }
    }

    #[test]
    fn linear_is_identity() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!((LINEAR.ease(t) - t).abs() < 1e-6, "t={t}");
        }
    }

    #[test]
    fn ease_in_out_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let y = EASE_IN_OUT.ease(i as f64 / 100.0);
            assert!(y >= prev - 1e-9, "not monotonic at {i}");
            prev = y;
        }
    }

    #[test]
    fn sharp_curve_lags_linear() {
        assert!(EASE_IN_SHARP.ease(0.5) < 0.5);
        assert!(EASE_OUT_SNAP.ease(0.5) > 0.5);
    }

    #[test]
    fn clamped_keeps_time_axis_in_range() {
        assert_eq!(KeySpline::clamped(-1.0, 0.0, 2.0, 1.0), LINEAR);
    }

    #[test]
    fn markup_rendering() {
        assert_eq!(EASE_IN_OUT.to_string(), "0.4 0 0.2 1");
    }
}
