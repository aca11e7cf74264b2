//! Generation settings with documented units and defaults.
//!
//! All magic numbers of the banner live here:
//! - canvas size (px), sample and bar counts
//! - preset bundles (`period_base`, amplitude scales)
//! - the parallax layer table (front → back)
//! - decoration (colors, label, optional resources)
//!
//! Everything derives `Deserialize` with `#[serde(default)]` so a partial TOML
//! file can override any subset. Parsing itself happens in the binary.

use core::fmt;
use core::str::FromStr;

use eqwave_core::error::{ensure_positive, Error, Result};
use eqwave_core::wave::{DepthProfile, WaveConfig};
use serde::{Deserialize, Serialize};

// ------------------------------------ Presets ------------------------------------

/// Named timing/amplitude bundle, resolved once and passed down by value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Slower and flatter.
    Calm,
    /// Reference banner timing.
    #[default]
    Classic,
    /// Faster, taller, busier.
    Hyper,
}

/// Values a [`Preset`] resolves to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PresetParams {
    /// Multiplier on every bar period (seconds per drawn second).
    pub period_base: f64,
    /// Multiplier on the wave amplitude.
    pub wave_amplitude_scale: f64,
    /// Multiplier on the zone height table.
    pub bar_amplitude_scale: f64,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Calm, Preset::Classic, Preset::Hyper];

    pub fn params(self) -> PresetParams {
        match self {
            Preset::Calm => PresetParams { period_base: 2.4, wave_amplitude_scale: 0.8, bar_amplitude_scale: 0.85 },
            Preset::Classic => PresetParams { period_base: 1.6, wave_amplitude_scale: 1.0, bar_amplitude_scale: 1.0 },
            Preset::Hyper => PresetParams { period_base: 1.0, wave_amplitude_scale: 1.2, bar_amplitude_scale: 1.15 },
        }
    }

    /// Time stretch relative to `Classic`; applied to layer scroll durations.
    #[inline]
    pub fn tempo_ratio(self) -> f64 {
        self.params().period_base / Preset::Classic.params().period_base
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Calm => "calm",
            Preset::Classic => "classic",
            Preset::Hyper => "hyper",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == key)
            .ok_or_else(|| Error::invalid("preset", format!("unknown preset `{s}` (calm, classic, hyper)")))
    }
}

// ------------------------------------ Canvas -------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// px
    pub width: f64,
    /// px; also the floor line the bars grow up from
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 960.0, height: 280.0 }
    }
}

// ------------------------------------ Bars ---------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    pub count: usize,
    /// Horizontal gap between bars (px).
    pub gap: f64,
    /// Chance in `[0,1]` that a bar carries a glitch spike.
    pub glitch_probability: f64,
    /// Wrap the bar group in the glow filter.
    pub glow: bool,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self { count: 60, gap: 2.0, glitch_probability: 1.0, glow: true }
    }
}

// ------------------------------------ Layers -------------------------------------

/// Visual weight and scroll timing of one parallax layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub opacity: f64,
    pub stroke_width: f64,
    /// Drift distance (px) of the non-seamless translate loop.
    pub drift_px: f64,
    /// Duration (s) of the drift loop at `Classic` tempo.
    pub drift_secs: f64,
    /// Duration (s) of a one-canvas-width scroll in seamless mode.
    pub seamless_secs: f64,
    #[serde(default)]
    pub glow: bool,
}

/// Default three-layer stack, front first.
pub fn classic_layers() -> Vec<LayerSpec> {
    let layer = |name: &str, opacity, stroke_width, drift_px, drift_secs, seamless_secs, glow| LayerSpec {
        name: name.to_string(),
        opacity,
        stroke_width,
        drift_px,
        drift_secs,
        seamless_secs,
        glow,
    };
    vec![
        layer("front", 1.0, 4.0, 10.0, 3.0, 20.0, true),
        layer("mid", 0.35, 3.0, 22.0, 5.5, 32.0, false),
        layer("back", 0.18, 2.0, 40.0, 9.0, 48.0, false),
    ]
}

// ------------------------------------ Decoration ---------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// percent, 0..=100
    pub offset: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    /// Centered label; `None` leaves the banner text-free.
    pub label: Option<String>,
    pub label_color: String,
    pub font_size: f64,
    pub letter_spacing: f64,
    pub background: String,
    pub gradient: Vec<GradientStop>,
    /// Tile the 4×4 scanline pattern over the background.
    pub scanlines: bool,
    /// Small mark riding the front wave.
    pub tracer: bool,
    /// Gaussian blur deviation of the glow filter.
    pub glow_deviation: f64,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        let stop = |offset, color: &str| GradientStop { offset, color: color.to_string() };
        Self {
            label: Some("EQWAVE".to_string()),
            label_color: "#ffffff".to_string(),
            font_size: 30.0,
            letter_spacing: 5.0,
            background: "#05010d".to_string(),
            gradient: vec![stop(0.0, "#ff2fdc"), stop(40.0, "#9b5cff"), stop(70.0, "#00f5ff"), stop(100.0, "#00f5ff")],
            scanlines: true,
            tracer: false,
            glow_deviation: 4.0,
        }
    }
}

// ------------------------------------ Root ---------------------------------------

/// Everything one render needs. Immutable once handed to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub canvas: CanvasConfig,
    pub wave: WaveConfig,
    /// Samples per wave layer.
    pub sample_count: usize,
    pub bars: BarConfig,
    /// Front layer first.
    pub layers: Vec<LayerSpec>,
    pub decoration: DecorationConfig,
    pub preset: Preset,
    /// Lossless horizontal scrolling (duplicated paths, closed sample loops).
    pub seamless: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            wave: WaveConfig::default(),
            sample_count: 200,
            bars: BarConfig::default(),
            layers: classic_layers(),
            decoration: DecorationConfig::default(),
            preset: Preset::default(),
            seamless: false,
        }
    }
}

impl GenerationConfig {
    /// Check every count/dimension up front so no partial scene is ever built.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("canvas.width", self.canvas.width)?;
        ensure_positive("canvas.height", self.canvas.height)?;
        if self.sample_count < 2 {
            return Err(Error::invalid("sample_count", format!("needs at least 2 samples, got {}", self.sample_count)));
        }
        if self.bars.count < 1 {
            return Err(Error::invalid("bars.count", "at least one bar is required"));
        }
        if !(self.bars.gap.is_finite() && self.bars.gap >= 0.0) {
            return Err(Error::invalid("bars.gap", format!("must be a non-negative number, got {}", self.bars.gap)));
        }
        if !(0.0..=1.0).contains(&self.bars.glitch_probability) {
            return Err(Error::invalid("bars.glitch_probability", "must lie in [0, 1]"));
        }
        for l in &self.layers {
            ensure_positive("layers.stroke_width", l.stroke_width)?;
            ensure_positive("layers.drift_secs", l.drift_secs)?;
            ensure_positive("layers.seamless_secs", l.seamless_secs)?;
            if !(l.opacity > 0.0 && l.opacity <= 1.0) {
                return Err(Error::invalid("layers.opacity", format!("`{}` opacity must lie in (0, 1]", l.name)));
            }
            if !l.drift_px.is_finite() {
                return Err(Error::invalid("layers.drift_px", format!("`{}` drift must be finite", l.name)));
            }
        }
        // front → back: prominence strictly falls, scroll strictly slows
        for pair in self.layers.windows(2) {
            let (near, far) = (&pair[0], &pair[1]);
            if far.opacity >= near.opacity || far.stroke_width >= near.stroke_width {
                return Err(Error::invalid(
                    "layers",
                    format!("`{}` must be less prominent than `{}` in front of it", far.name, near.name),
                ));
            }
            if far.drift_secs <= near.drift_secs || far.seamless_secs <= near.seamless_secs {
                return Err(Error::invalid(
                    "layers",
                    format!("`{}` must scroll slower than `{}` in front of it", far.name, near.name),
                ));
            }
        }
        // every layer needs its own, smaller depth under the profile actually used
        self.effective_wave().profile.check_layers(self.layers.len())?;
        ensure_positive("decoration.font_size", self.decoration.font_size)?;
        Ok(())
    }

    /// Wave settings with the preset amplitude and seamless mode applied.
    pub fn effective_wave(&self) -> WaveConfig {
        let mut wave = self.wave.clone();
        wave.amplitude *= self.preset.params().wave_amplitude_scale;
        if self.seamless {
            wave.seamless = true;
            wave.profile = DepthProfile::Tileable;
        }
        wave
    }
}
