//! Midpoint-quadratic smoothing of sample columns into path data.
//!
//! Samples are spread at a uniform step `width / (n - 1)`. The path moves to
//! the first sample, then for every following sample emits a quadratic curve
//! whose control point sits halfway between the previous and current x at the
//! previous sample's height. Cheap and tangent-free; curvature is only roughly
//! continuous at sample boundaries.

use core::fmt;

use crate::error::{ensure_finite, ensure_positive, Error, Result};
use crate::math::push_num;

/// A single path command in absolute coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo { x: f64, y: f64 },
    QuadTo { cx: f64, cy: f64, x: f64, y: f64 },
}

/// Ordered path commands; renders to SVG path data via `Display`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    segments: Vec<PathSegment>,
}

impl PathData {
    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of `QuadTo` commands.
    pub fn curve_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, PathSegment::QuadTo { .. })).count()
    }

    /// Copy of this path shifted horizontally by `dx`.
    pub fn translated(&self, dx: f64) -> Self {
        let segments = self
            .segments
            .iter()
            .map(|s| match *s {
                PathSegment::MoveTo { x, y } => PathSegment::MoveTo { x: x + dx, y },
                PathSegment::QuadTo { cx, cy, x, y } => PathSegment::QuadTo { cx: cx + dx, cy, x: x + dx, y },
            })
            .collect();
        Self { segments }
    }

    /// This path followed by `next`, whose leading move is dropped so the
    /// result stays one continuous stroke.
    pub fn extended(&self, next: &PathData) -> Self {
        let skip = usize::from(matches!(next.segments.first(), Some(PathSegment::MoveTo { .. })));
        let mut segments = Vec::with_capacity(self.segments.len() + next.segments.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&next.segments[skip..]);
        Self { segments }
    }

    /// Append `d` attribute text.
    pub fn push_markup(&self, out: &mut String) {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            match *seg {
                PathSegment::MoveTo { x, y } => {
                    out.push_str("M ");
                    push_num(out, x);
                    out.push(' ');
                    push_num(out, y);
                }
                PathSegment::QuadTo { cx, cy, x, y } => {
                    out.push_str("Q ");
                    push_num(out, cx);
                    out.push(' ');
                    push_num(out, cy);
                    out.push(' ');
                    push_num(out, x);
                    out.push(' ');
                    push_num(out, y);
                }
            }
        }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::with_capacity(self.segments.len() * 28);
        self.push_markup(&mut s);
        f.write_str(&s)
    }
}

/// Turns sample columns into [`PathData`] spanning a fixed width.
#[derive(Copy, Clone, Debug)]
pub struct PathBuilder {
    width: f64,
    x0: f64,
}

impl PathBuilder {
    pub fn new(width: f64) -> Result<Self> {
        Ok(Self { width: ensure_positive("path.width", width)?, x0: 0.0 })
    }

    /// Start the path at `x0` instead of 0.
    pub fn with_origin(mut self, x0: f64) -> Result<Self> {
        self.x0 = ensure_finite("path.origin", x0)?;
        Ok(self)
    }

    pub fn build(&self, points: &[f64]) -> Result<PathData> {
        let n = points.len();
        if n < 2 {
            return Err(Error::invalid("points", format!("needs at least 2 points, got {n}")));
        }
        if let Some(bad) = points.iter().find(|v| !v.is_finite()) {
            return Err(Error::invalid("points", format!("non-finite sample {bad}")));
        }

        let step = self.width / (n - 1) as f64;
        let mut segments = Vec::with_capacity(n);
        segments.push(PathSegment::MoveTo { x: self.x0, y: points[0] });
        for (i, pair) in points.windows(2).enumerate() {
            let px = self.x0 + i as f64 * step;
            let x = self.x0 + (i + 1) as f64 * step;
            segments.push(PathSegment::QuadTo { cx: 0.5 * (px + x), cy: pair[0], x, y: pair[1] });
        }
        Ok(PathData { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_move_then_n_minus_one_curves() {
        let p = PathBuilder::new(960.0).unwrap().build(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(p.segments().len(), 5);
        assert_eq!(p.curve_count(), 4);
        assert!(matches!(p.segments()[0], PathSegment::MoveTo { .. }));
    }

    #[test]
    fn renders_midpoint_controls() {
        let p = PathBuilder::new(20.0).unwrap().build(&[140.0, 130.0, 150.5]).unwrap();
        assert_eq!(p.to_string(), "M 0 140 Q 5 140 10 130 Q 15 130 20 150.5");
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let pts: Vec<f64> = (0..50).map(|i| 140.0 + (i as f64 * 0.37).sin() * 20.0).collect();
        let b = PathBuilder::new(960.0).unwrap();
        assert_eq!(b.build(&pts).unwrap().to_string(), b.build(&pts).unwrap().to_string());
    }

    #[test]
    fn too_few_points() {
        let b = PathBuilder::new(10.0).unwrap();
        assert!(b.build(&[]).is_err());
        assert!(b.build(&[1.0]).is_err());
    }

    #[test]
    fn rejects_bad_width() {
        assert!(PathBuilder::new(0.0).is_err());
        assert!(PathBuilder::new(f64::INFINITY).is_err());
    }

    #[test]
    fn extended_drops_the_second_move() {
        let b = PathBuilder::new(10.0).unwrap();
        let p = b.build(&[0.0, 1.0, 0.0]).unwrap();
        let both = p.extended(&p.translated(10.0));
        assert_eq!(both.segments().len(), 5);
        assert_eq!(both.curve_count(), 4);
        assert_eq!(both.to_string(), "M 0 0 Q 2.5 0 5 1 Q 7.5 1 10 0 Q 12.5 0 15 1 Q 17.5 1 20 0");
    }

    #[test]
    fn translated_shifts_every_x() {
        let b = PathBuilder::new(10.0).unwrap();
        let p = b.build(&[0.0, 1.0]).unwrap();
        let shifted = b.with_origin(10.0).unwrap().build(&[0.0, 1.0]).unwrap();
        assert_eq!(p.translated(10.0), shifted);
    }
}
