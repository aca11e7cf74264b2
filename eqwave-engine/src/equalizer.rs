//! Stereo-zoned equalizer bars with keyframed pulses and glitch spikes.
//!
//! Each bar sits in a zone picked purely from its normalized position:
//! left third-ish is bass (tall, slow, calm), right is treble (short, fast,
//! busy), the middle mixes both. The zone indexes a constant table; adding a
//! zone means adding a row, not a branch.
//!
//! A bar animates on two independent tracks per attribute:
//! - primary : 5-keyframe loop `[min, max, mid, max·chaos, min]` with
//!             uneven key times and one easing curve per interval
//! - glitch  : short spike to `max·(1.1..1.3)` that fires after a random delay
//!             and re-fires a fixed gap after each end; it overrides the
//!             primary value while running (see [`crate::nodes::resolve`])

use eqwave_core::easing::{KeySpline, EASE_IN_OUT, EASE_IN_SHARP, EASE_OUT_SNAP, EASE_SINE};
use eqwave_core::error::{ensure_positive, Error, Result};
use eqwave_core::math::round_to;
use eqwave_core::rng::RandomSource;
use tracing::debug;

use crate::config::{BarConfig, PresetParams};
use crate::nodes::{resolve, AnimationSegment, Attr, Begin};

/// `pos < LEFT_EDGE` → left.
pub const LEFT_EDGE: f64 = 0.35;
/// `pos > RIGHT_EDGE` → right.
pub const RIGHT_EDGE: f64 = 0.65;

/// Normalized keyframe times of the primary loop.
pub const PRIMARY_KEY_TIMES: [f64; 5] = [0.0, 0.2, 0.45, 0.7, 1.0];
/// Easing per primary interval: snap up, settle, sag, recover.
pub const PRIMARY_SPLINES: [KeySpline; 4] = [EASE_OUT_SNAP, EASE_IN_OUT, EASE_IN_SHARP, EASE_SINE];

/// Smallest fraction of a spread a draw may use; keeps `min < mid < max` strict.
const MIN_SPREAD_FRACTION: f64 = 0.05;
/// Headroom kept under the canvas top when the height table is compressed.
const HEADROOM: f64 = 0.9;

const SPEED_VARIANCE_MIN: f64 = 0.85;
const SPEED_VARIANCE_SPAN: f64 = 0.3;
const OPACITY_MIN: f64 = 0.3;
const OPACITY_SPAN: f64 = 0.5;
const GLITCH_MULT_MIN: f64 = 1.1;
const GLITCH_MULT_SPAN: f64 = 0.2;
const GLITCH_DUR_MIN: f64 = 0.05;
const GLITCH_DUR_SPAN: f64 = 0.08;
const GLITCH_GAP_MIN: f64 = 0.25;
const GLITCH_GAP_SPAN: f64 = 0.5;

/// Stereo-field position of a bar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Bass
    Left = 0,
    /// Mix
    Center = 1,
    /// Treble
    Right = 2,
}

/// Per-zone draw ranges. Heights in px, periods in seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoneProfile {
    pub min_base: f64,
    pub min_spread: f64,
    pub mid_spread: f64,
    pub max_spread: f64,
    pub period_base: f64,
    pub period_spread: f64,
    /// Multiplier on `max` for the fourth keyframe.
    pub chaos: f64,
}

impl ZoneProfile {
    /// Tallest `max` this profile can draw.
    #[inline]
    pub fn worst_case_height(&self) -> f64 {
        self.min_base + self.min_spread + self.mid_spread + self.max_spread
    }
}

const ZONE_TABLE: [ZoneProfile; 3] = [
    // Left – bass
    ZoneProfile { min_base: 28.0, min_spread: 15.0, mid_spread: 30.0, max_spread: 45.0, period_base: 4.5, period_spread: 3.5, chaos: 0.5 },
    // Center – mix
    ZoneProfile { min_base: 18.0, min_spread: 12.0, mid_spread: 26.0, max_spread: 40.0, period_base: 3.6, period_spread: 3.0, chaos: 0.85 },
    // Right – treble
    ZoneProfile { min_base: 14.0, min_spread: 12.0, mid_spread: 22.0, max_spread: 32.0, period_base: 2.4, period_spread: 2.2, chaos: 1.0 },
];

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Left, Zone::Center, Zone::Right];

    /// Classify a normalized position in `[0, 1)`.
    #[inline]
    pub fn classify(pos: f64) -> Zone {
        if pos < LEFT_EDGE {
            Zone::Left
        } else if pos > RIGHT_EDGE {
            Zone::Right
        } else {
            Zone::Center
        }
    }

    /// Zone of bar `index` out of `count`.
    #[inline]
    pub fn of_bar(index: usize, count: usize) -> Zone {
        Zone::classify(index as f64 / count.max(1) as f64)
    }

    #[inline]
    pub fn profile(self) -> &'static ZoneProfile {
        &ZONE_TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Left => "bass",
            Zone::Center => "mix",
            Zone::Right => "treble",
        }
    }
}

/// Transient spike layered over a bar's primary loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Glitch {
    /// Seconds before the first spike.
    pub delay: f64,
    /// Spike length in seconds.
    pub dur: f64,
    /// Seconds between the end of one spike and the start of the next.
    pub gap: f64,
    /// Spike height as a multiple of `max_h`.
    pub multiplier: f64,
    /// Spike height in px (capped at the canvas height).
    pub height: f64,
}

/// One generated equalizer unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub index: usize,
    pub x: f64,
    pub width: f64,
    pub zone: Zone,
    pub min_h: f64,
    pub mid_h: f64,
    pub max_h: f64,
    pub chaos: f64,
    /// Primary loop period in seconds.
    pub period: f64,
    pub opacity: f64,
    pub glitch: Option<Glitch>,
    /// Floor line the bar grows up from (`y = floor - height`).
    pub floor: f64,
}

impl Bar {
    /// Primary keyframe heights `[min, max, mid, max·chaos, min]`; the chaos
    /// frame never drops below `min`.
    pub fn primary_values(&self) -> [f64; 5] {
        let chaos_h = (self.max_h * self.chaos).max(self.min_h);
        [self.min_h, self.max_h, self.mid_h, chaos_h, self.min_h]
    }

    #[inline]
    pub fn y_for(&self, height: f64) -> f64 {
        self.floor - height
    }

    /// Id of the glitch height track; the other glitch tracks chain off it.
    pub fn glitch_id(&self) -> String {
        format!("eq{}g", self.index)
    }

    fn primary(&self, attribute: Attr, values: Vec<f64>) -> AnimationSegment {
        AnimationSegment::new(attribute, self.period, values)
            .with_keys(PRIMARY_KEY_TIMES.to_vec(), PRIMARY_SPLINES.to_vec())
            .forever()
    }

    /// All animation tracks of the bar, primary first.
    pub fn tracks(&self) -> Vec<AnimationSegment> {
        let heights = self.primary_values();
        let ys = heights.map(|h| self.y_for(h));
        let mut out = vec![self.primary(Attr::Height, heights.to_vec()), self.primary(Attr::Y, ys.to_vec())];

        if let Some(g) = self.glitch {
            let id = self.glitch_id();
            let begin = Begin::Chained { first: g.delay, after: id.clone(), gap: g.gap };
            let spike = |attribute, rest: f64, peak: f64| {
                AnimationSegment::new(attribute, g.dur, vec![rest, peak, rest]).begin(begin.clone())
            };
            out.push(spike(Attr::Height, self.min_h, g.height).with_id(id));
            out.push(spike(Attr::Y, self.y_for(self.min_h), self.y_for(g.height)));
            out.push(spike(Attr::Opacity, self.opacity, 1.0));
        }
        out
    }

    /// Height shown at document time `t` after layering.
    pub fn height_at(&self, t: f64) -> f64 {
        resolve(&self.tracks(), Attr::Height, t, self.min_h)
    }
}

/// Draws bars for a canvas under one preset.
#[derive(Copy, Clone, Debug)]
pub struct EqualizerGenerator {
    cfg: BarConfig,
    preset: PresetParams,
}

impl EqualizerGenerator {
    pub fn new(cfg: BarConfig, preset: PresetParams) -> Result<Self> {
        ensure_positive("preset.period_base", preset.period_base)?;
        ensure_positive("preset.bar_amplitude_scale", preset.bar_amplitude_scale)?;
        if !(0.0..=1.0).contains(&cfg.glitch_probability) {
            return Err(Error::invalid("bars.glitch_probability", "must lie in [0, 1]"));
        }
        Ok(Self { cfg, preset })
    }

    /// Height multiplier after compressing the table under the canvas top.
    fn height_scale(&self, canvas_height: f64) -> f64 {
        let worst = ZONE_TABLE.iter().map(ZoneProfile::worst_case_height).fold(0.0, f64::max);
        let peak = worst * (GLITCH_MULT_MIN + GLITCH_MULT_SPAN);
        self.preset.bar_amplitude_scale.min(HEADROOM * canvas_height / peak)
    }

    pub fn generate<R>(&self, bar_count: usize, width: f64, height: f64, rng: &mut R) -> Result<Vec<Bar>>
    where
        R: RandomSource + ?Sized,
    {
        if bar_count < 1 {
            return Err(Error::invalid("bar_count", "at least one bar is required"));
        }
        ensure_positive("canvas.width", width)?;
        ensure_positive("canvas.height", height)?;

        let slot = width / bar_count as f64;
        let bar_width = if slot > self.cfg.gap { slot - self.cfg.gap } else { slot * 0.5 };
        let scale = self.height_scale(height);

        let bars: Vec<Bar> = (0..bar_count)
            .map(|i| {
                let zone = Zone::of_bar(i, bar_count);
                self.draw_bar(i, zone, i as f64 * slot, bar_width, height, scale, rng)
            })
            .collect();

        debug!(
            bars = bars.len(),
            glitched = bars.iter().filter(|b| b.glitch.is_some()).count(),
            scale,
            "generated equalizer"
        );
        Ok(bars)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_bar<R>(&self, index: usize, zone: Zone, x: f64, width: f64, floor: f64, scale: f64, rng: &mut R) -> Bar
    where
        R: RandomSource + ?Sized,
    {
        let p = zone.profile();
        let frac = |r: f64| r.max(MIN_SPREAD_FRACTION);

        let min_h = (p.min_base + rng.next_f64() * p.min_spread) * scale;
        let mid_h = min_h + frac(rng.next_f64()) * p.mid_spread * scale;
        let max_h = mid_h + frac(rng.next_f64()) * p.max_spread * scale;

        let zone_period = rng.spread(p.period_base, p.period_spread);
        let variance = rng.spread(SPEED_VARIANCE_MIN, SPEED_VARIANCE_SPAN);
        let period = round_to(zone_period * variance * self.preset.period_base, 2);

        let opacity = round_to(rng.spread(OPACITY_MIN, OPACITY_SPAN), 3);

        // always consume the glitch draws so the stream does not depend on presence
        let present = rng.next_f64() < self.cfg.glitch_probability;
        let multiplier = rng.spread(GLITCH_MULT_MIN, GLITCH_MULT_SPAN);
        let delay = round_to(rng.next_f64() * period, 2);
        let dur = round_to(rng.spread(GLITCH_DUR_MIN, GLITCH_DUR_SPAN), 2);
        let gap = round_to(period * rng.spread(GLITCH_GAP_MIN, GLITCH_GAP_SPAN), 2);
        let glitch = present.then(|| Glitch { delay, dur, gap, multiplier, height: (max_h * multiplier).min(floor) });

        Bar { index, x, width, zone, min_h, mid_h, max_h, chaos: p.chaos, period, opacity, glitch, floor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use eqwave_core::rng::{FixedSource, SeededSource};

    fn generator() -> EqualizerGenerator {
        EqualizerGenerator::new(BarConfig::default(), Preset::Classic.params()).unwrap()
    }

    #[test]
    fn three_bars_cover_three_zones() {
        let bars = generator().generate(3, 90.0, 280.0, &mut SeededSource::new(1)).unwrap();
        let zones: Vec<Zone> = bars.iter().map(|b| b.zone).collect();
        assert_eq!(zones, vec![Zone::Left, Zone::Center, Zone::Right]);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(Zone::classify(0.3499), Zone::Left);
        assert_eq!(Zone::classify(0.35), Zone::Center);
        assert_eq!(Zone::classify(0.65), Zone::Center);
        assert_eq!(Zone::classify(0.6501), Zone::Right);
    }

    #[test]
    fn zero_draws_still_order_heights() {
        let bars = generator().generate(20, 960.0, 280.0, &mut FixedSource::new(0.0)).unwrap();
        for b in &bars {
            assert!(b.min_h < b.mid_h && b.mid_h < b.max_h, "{b:?}");
        }
    }

    #[test]
    fn invalid_inputs() {
        let g = generator();
        let mut rng = FixedSource::new(0.5);
        assert!(g.generate(0, 960.0, 280.0, &mut rng).is_err());
        assert!(g.generate(10, 0.0, 280.0, &mut rng).is_err());
        assert!(g.generate(10, 960.0, -5.0, &mut rng).is_err());
    }

    #[test]
    fn primary_values_stay_in_range() {
        let bars = generator().generate(60, 960.0, 280.0, &mut SeededSource::new(5)).unwrap();
        for b in &bars {
            for v in b.primary_values() {
                assert!(v >= b.min_h && v <= b.max_h && v <= 280.0, "{v} outside {b:?}");
            }
        }
    }

    #[test]
    fn small_canvas_compresses_heights() {
        let bars = generator().generate(12, 120.0, 40.0, &mut SeededSource::new(8)).unwrap();
        for b in &bars {
            assert!(b.max_h < 40.0);
            if let Some(g) = b.glitch {
                assert!(g.height <= 40.0);
            }
        }
    }

    #[test]
    fn glitch_probability_zero_disables_spikes() {
        let cfg = BarConfig { glitch_probability: 0.0, ..BarConfig::default() };
        let g = EqualizerGenerator::new(cfg, Preset::Classic.params()).unwrap();
        let bars = g.generate(30, 960.0, 280.0, &mut SeededSource::new(2)).unwrap();
        assert!(bars.iter().all(|b| b.glitch.is_none()));
        assert!(bars.iter().all(|b| b.tracks().len() == 2));
    }

    #[test]
    fn glitch_timing_ranges() {
        let bars = generator().generate(60, 960.0, 280.0, &mut SeededSource::new(13)).unwrap();
        for b in &bars {
            let g = b.glitch.expect("probability 1.0");
            assert!(g.delay >= 0.0 && g.delay <= b.period);
            assert!(g.dur >= 0.05 && g.dur <= 0.13);
            assert!(g.gap > 0.0 && g.gap < b.period);
        }
    }

    #[test]
    fn glitch_overrides_while_running() {
        let mut bars = generator().generate(1, 100.0, 280.0, &mut FixedSource::new(0.5)).unwrap();
        let b = bars.remove(0);
        let g = b.glitch.unwrap();
        let mid_spike = g.delay + g.dur * 0.5;
        assert!((b.height_at(mid_spike) - g.height).abs() < 1e-6);
        let between = g.delay + g.dur + g.gap * 0.5;
        assert!(b.height_at(between) <= b.max_h);
    }

    #[test]
    fn bass_is_slower_than_treble_on_average() {
        let bars = generator().generate(60, 960.0, 280.0, &mut SeededSource::new(21)).unwrap();
        let avg = |z: Zone| {
            let v: Vec<f64> = bars.iter().filter(|b| b.zone == z).map(|b| b.period).collect();
            v.iter().sum::<f64>() / v.len() as f64
        };
        assert!(avg(Zone::Left) > avg(Zone::Right));
    }
}
