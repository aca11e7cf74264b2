//! Numeric helpers shared by the generators.
//!
//! Design goals:
//! - Math backend selection in one place (`fast-math` swaps the sine)
//! - Clean, side-effect free helpers that are easy to test
//! - Deterministic number formatting for the emitted markup
//!
//! Conventions:
//! - Geometry and timing are `f64`; markup precision is fixed at 3 decimals.

#![allow(clippy::excessive_precision)]

use core::f64::consts::PI;
use core::fmt::Write as _;

use cfg_if::cfg_if;

// --------------------------------- Constants -------------------------------------

/// 2π (commonly useful)
pub const TAU: f64 = 2.0 * PI;

/// Decimal places kept when numbers are written into markup.
pub const MARKUP_DECIMALS: i32 = 3;

// --------------------------------- Utilities -------------------------------------

#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo { lo } else if x > hi { hi } else { x }
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Round to `decimals` places (half away from zero).
#[inline]
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let k = 10f64.powi(decimals);
    (x * k).round() / k
}

/// Map `x` from `[lo, hi]` into `[0, 1]`; degenerate ranges map to 0.
#[inline]
pub fn unlerp(lo: f64, hi: f64, x: f64) -> f64 {
    let span = hi - lo;
    if span.abs() <= f64::EPSILON { 0.0 } else { (x - lo) / span }
}

// --------------------------------- Trig ------------------------------------------

/// Sine used by the harmonic sum. With `fast-math` this is a range-reduced
/// 7th-order odd polynomial (abs error < 1e-3).
#[inline]
pub fn sine(x: f64) -> f64 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            let k = (x / TAU).round();
            let mut xr = x - k * TAU;
            // fold into [-π/2, π/2] where the Taylor tail stays small
            if xr > 0.5 * PI {
                xr = PI - xr;
            } else if xr < -0.5 * PI {
                xr = -PI - xr;
            }
            let x2 = xr * xr;
            let x3 = x2 * xr;
            xr + (-1.0 / 6.0) * x3 + (1.0 / 120.0) * x3 * x2 + (-1.0 / 5040.0) * x3 * x2 * x2
        } else {
            x.sin()
        }
    }
}

// --------------------------------- Formatting ------------------------------------

/// Format a number for markup: 3 decimals, trailing zeros trimmed, no `-0`.
pub fn fmt_num(x: f64) -> String {
    let mut s = String::with_capacity(12);
    push_num(&mut s, x);
    s
}

/// Append the [`fmt_num`] rendering of `x` to `out`.
pub fn push_num(out: &mut String, x: f64) {
    let r = round_to(x, MARKUP_DECIMALS);
    let r = if r == 0.0 { 0.0 } else { r };
    let start = out.len();
    let _ = write!(out, "{:.*}", MARKUP_DECIMALS as usize, r);
    if out[start..].contains('.') {
        let trimmed = out[start..].trim_end_matches('0').trim_end_matches('.').len();
        out.truncate(start + trimmed);
    }
}

/// Format seconds as a SMIL clock value (`"2.35s"`).
pub fn fmt_secs(secs: f64) -> String {
    let mut s = fmt_num(secs);
    s.push('s');
    s
}

/// Join numbers with `sep` using [`push_num`].
pub fn join_nums(values: &[f64], sep: &str) -> String {
    let mut s = String::with_capacity(values.len() * 8);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            s.push_str(sep);
        }
        push_num(&mut s, *v);
    }
    s
}

// --------------------------------- Tests -----------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_trims_and_rounds() {
        assert_eq!(fmt_num(140.0), "140");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(1.23456), "1.235");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(-12.1), "-12.1");
        assert_eq!(fmt_secs(3.0), "3s");
    }

    #[test]
    fn join_uses_separator() {
        assert_eq!(join_nums(&[1.0, 2.25, 3.0], ";"), "1;2.25;3");
        assert_eq!(join_nums(&[], ";"), "");
    }

    #[test]
    fn clamp_respects_both_bounds() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn sine_is_close_to_std() {
        for i in 0..64 {
            let x = -10.0 + i as f64 * 0.31;
            assert!((sine(x) - x.sin()).abs() < 1e-3, "x={x}");
        }
    }

    #[test]
    fn unlerp_handles_flat_range() {
        assert_eq!(unlerp(3.0, 3.0, 7.0), 0.0);
        assert!((unlerp(0.0, 4.0, 1.0) - 0.25).abs() < 1e-12);
    }
}
