//! Building blocks (nodes) of a scene description.
//!
//! These are plain data: geometry, paint references and animation directives.
//! Nothing here renders; [`crate::svg`] turns a tree of nodes into markup.
//!
//! Contents:
//! - `Length`, `Paint`              : attribute value helpers
//! - `Attr`, `Begin`                : animation target and start schedule
//! - `AnimationSegment`             : keyframe track (values, keyTimes, keySplines)
//! - `TranslateLoop`, `MotionPath`  : transform / motion-along-path directives
//! - `Rect`, `PathNode`, `TextNode`, `Group`, `Element`
//! - `Resource`                     : reusable defs (gradient, glow, scanlines)
//!
//! Tracks can be sampled with [`AnimationSegment::value_at`]; [`resolve`]
//! applies the layering policy when several tracks drive the same attribute.

use eqwave_core::easing::KeySpline;
use eqwave_core::math::{lerp, unlerp};
use eqwave_core::path::PathData;

/// Absolute px or percent of the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

/// Fill/stroke paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    None,
    Color(String),
    /// Reference to a [`Resource`] id.
    Url(String),
}

/// Animated presentation attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attr {
    Height,
    Y,
    Opacity,
}

impl Attr {
    pub fn as_str(self) -> &'static str {
        match self {
            Attr::Height => "height",
            Attr::Y => "y",
            Attr::Opacity => "opacity",
        }
    }
}

/// When a track starts.
#[derive(Clone, Debug, PartialEq)]
pub enum Begin {
    /// Offset in seconds from document start.
    At(f64),
    /// Starts at `first`, then restarts `gap` seconds after each end of the
    /// track with id `after` (a track with the same duration).
    Chained { first: f64, after: String, gap: f64 },
}

/// Keyframe track on one attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSegment {
    pub id: Option<String>,
    pub attribute: Attr,
    /// Seconds per activation.
    pub dur: f64,
    pub values: Vec<f64>,
    /// Normalized keyframe times; `None` spaces the values evenly.
    pub key_times: Option<Vec<f64>>,
    /// One curve per interval; `Some` selects spline pacing.
    pub key_splines: Option<Vec<KeySpline>>,
    pub begin: Option<Begin>,
    pub repeat_forever: bool,
}

impl AnimationSegment {
    /// Linear, evenly spaced track starting at 0.
    pub fn new(attribute: Attr, dur: f64, values: Vec<f64>) -> Self {
        Self {
            id: None,
            attribute,
            dur,
            values,
            key_times: None,
            key_splines: None,
            begin: None,
            repeat_forever: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_keys(mut self, key_times: Vec<f64>, key_splines: Vec<KeySpline>) -> Self {
        self.key_times = Some(key_times);
        self.key_splines = Some(key_splines);
        self
    }

    pub fn begin(mut self, begin: Begin) -> Self {
        self.begin = Some(begin);
        self
    }

    pub fn forever(mut self) -> Self {
        self.repeat_forever = true;
        self
    }

    /// Start time of the activation covering `t`, if the track is running then.
    pub fn activation_at(&self, t: f64) -> Option<f64> {
        if self.dur <= 0.0 {
            return None;
        }
        match &self.begin {
            None | Some(Begin::At(_)) => {
                let start = match self.begin {
                    Some(Begin::At(d)) => d,
                    _ => 0.0,
                };
                if t < start {
                    return None;
                }
                if self.repeat_forever {
                    let k = ((t - start) / self.dur).floor();
                    Some(start + k * self.dur)
                } else if t < start + self.dur {
                    Some(start)
                } else {
                    None
                }
            }
            Some(Begin::Chained { first, gap, .. }) => {
                if t < *first {
                    return None;
                }
                let cycle = self.dur + gap.max(0.0);
                let k = ((t - first) / cycle).floor();
                let start = first + k * cycle;
                (t - start < self.dur).then_some(start)
            }
        }
    }

    /// Begin of the interval covering `t`. Repeats of a looping track stay
    /// inside the interval that started them; chained restarts open new ones.
    pub fn interval_begin_at(&self, t: f64) -> Option<f64> {
        let start = self.activation_at(t)?;
        Some(match self.begin {
            Some(Begin::Chained { .. }) => start,
            Some(Begin::At(d)) => d,
            None => 0.0,
        })
    }

    /// Value `local` seconds into one activation.
    pub fn value_at(&self, local: f64) -> f64 {
        let n = self.values.len();
        match n {
            0 => return 0.0,
            1 => return self.values[0],
            _ => {}
        }
        let p = (local / self.dur).clamp(0.0, 1.0);
        let even: Vec<f64>;
        let times: &[f64] = match &self.key_times {
            Some(kt) if kt.len() == n => kt,
            _ => {
                even = (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
                &even
            }
        };
        let seg = times.windows(2).position(|w| p <= w[1]).unwrap_or(n - 2);
        let mut u = unlerp(times[seg], times[seg + 1], p).clamp(0.0, 1.0);
        if let Some(curve) = self.key_splines.as_ref().and_then(|s| s.get(seg)) {
            u = curve.ease(u);
        }
        lerp(self.values[seg], self.values[seg + 1], u)
    }

    /// Value at document time `t`, or `None` when inactive.
    pub fn sample(&self, t: f64) -> Option<f64> {
        self.activation_at(t).map(|start| self.value_at(t - start))
    }
}

/// Resolve an attribute at time `t` across layered tracks.
///
/// Policy: among tracks running at `t`, the one whose current interval began
/// most recently owns the value; ties go to the later track in the list. With
/// no running track the static `base` value shows.
pub fn resolve(tracks: &[AnimationSegment], attribute: Attr, t: f64, base: f64) -> f64 {
    tracks
        .iter()
        .filter(|a| a.attribute == attribute)
        .filter_map(|a| a.interval_begin_at(t).map(|began| (began, a)))
        .fold(None, |best: Option<(f64, &AnimationSegment)>, (began, a)| match best {
            Some((b, _)) if b > began => best,
            _ => Some((began, a)),
        })
        .map_or(base, |(_, a)| a.sample(t).unwrap_or(base))
}

/// Horizontal translate loop (`animateTransform type="translate"`).
#[derive(Clone, Debug, PartialEq)]
pub struct TranslateLoop {
    pub from_x: f64,
    pub to_x: f64,
    pub dur: f64,
}

impl TranslateLoop {
    #[inline]
    pub fn travel(&self) -> f64 {
        (self.to_x - self.from_x).abs()
    }
}

/// Motion along a path (`animateMotion`).
#[derive(Clone, Debug, PartialEq)]
pub struct MotionPath {
    pub path: PathData,
    pub dur: f64,
    /// Rotate to follow the path tangent.
    pub rotate_auto: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Animation {
    Attribute(AnimationSegment),
    Translate(TranslateLoop),
    Motion(MotionPath),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
    pub fill: Paint,
    pub opacity: Option<f64>,
    pub animations: Vec<Animation>,
}

impl Rect {
    /// Viewport-filling rectangle.
    pub fn full(fill: Paint) -> Self {
        Self {
            x: Length::Px(0.0),
            y: Length::Px(0.0),
            width: Length::Percent(100.0),
            height: Length::Percent(100.0),
            fill,
            opacity: None,
            animations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathNode {
    pub d: PathData,
    pub stroke: Paint,
    pub stroke_width: f64,
    pub fill: Paint,
    pub opacity: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub x: Length,
    pub y: Length,
    pub content: String,
    pub font_size: f64,
    pub letter_spacing: f64,
    pub font_family: String,
    pub fill: Paint,
    pub opacity: Option<f64>,
    /// Resource id of a filter.
    pub filter: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub id: Option<String>,
    /// Resource id of a filter.
    pub filter: Option<String>,
    pub children: Vec<Element>,
    pub animations: Vec<Animation>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Rect(Rect),
    Path(PathNode),
    Text(TextNode),
    Group(Group),
}

/// Reusable definitions referenced by id.
#[derive(Clone, Debug, PartialEq)]
pub enum Resource {
    /// Left-to-right gradient; stops are `(percent, color)`.
    LinearGradient { id: String, stops: Vec<(f64, String)> },
    /// Gaussian blur merged under the source graphic.
    Glow { id: String, std_deviation: f64 },
    /// Tiling pattern with one horizontal line per tile.
    Scanlines { id: String, size: f64, line: f64, color: String },
}

impl Resource {
    pub fn id(&self) -> &str {
        match self {
            Resource::LinearGradient { id, .. } | Resource::Glow { id, .. } | Resource::Scanlines { id, .. } => id,
        }
    }
}
