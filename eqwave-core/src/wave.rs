//! Layered waveform synthesis from summed sine harmonics.
//!
//! A layer's samples are
//! `baseline - depth(layer) * amplitude * Σ w_k sin(2π t c_k(layer) + φ s_k)`
//! with `t = i / n`. The phase `φ` is drawn once per call from the injected
//! [`RandomSource`]; each harmonic scales it by `s_k` so the partials drift
//! against each other between layers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_finite, Error, Result};
use crate::math::{sine, TAU};
use crate::rng::RandomSource;

/// One sine partial of the wave.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Harmonic {
    /// Relative amplitude (multiplied by [`WaveConfig::amplitude`]).
    pub weight: f64,
    /// Cycles across the canvas on the front layer.
    pub cycles: f64,
    /// Extra cycles per layer index behind the front one.
    pub cycles_per_layer: f64,
    /// Multiplier on the drawn phase (0 pins the partial).
    pub phase_scale: f64,
}

impl Harmonic {
    #[inline]
    pub const fn new(weight: f64, cycles: f64, cycles_per_layer: f64, phase_scale: f64) -> Self {
        Self { weight, cycles, cycles_per_layer, phase_scale }
    }

    #[inline]
    pub fn cycles_for(&self, layer: usize) -> f64 {
        self.cycles + self.cycles_per_layer * layer as f64
    }
}

/// The three-partial stack of the classic banner.
pub fn classic_harmonics() -> Vec<Harmonic> {
    vec![
        Harmonic::new(1.0, 1.0, 0.0, 1.0),
        Harmonic::new(0.5, 3.0, 1.0, 0.7),
        Harmonic::new(6.0 / 28.0, 6.0, 1.5, 0.0),
    ]
}

/// Fixed per-layer `(weight, cycles)` table. Integer cycle counts keep a
/// one-width translation seamless. Weights are relative to the row's depth.
const TILEABLE_TABLE: [[(f64, f64); 3]; 3] = [
    [(1.0, 1.0), (0.5, 3.0), (0.21, 6.0)],
    [(1.0, 1.0), (0.5, 4.0), (0.21, 8.0)],
    [(1.0, 2.0), (0.5, 5.0), (0.22, 9.0)],
];
/// Depth of each [`TILEABLE_TABLE`] row, front first.
const TILEABLE_DEPTH: [f64; 3] = [1.0, 0.75, 0.5];
const TILEABLE_PHASE_SCALE: [f64; 3] = [1.0, 0.7, 0.0];

/// How a layer index turns into amplitude and texture.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DepthProfile {
    /// `depth = 1 - layer * step` applied to [`WaveConfig::harmonics`].
    Linear { step: f64 },
    /// Per-layer preset table; layers past the table reuse the last row.
    Tileable,
}

impl Default for DepthProfile {
    fn default() -> Self {
        Self::Linear { step: 0.25 }
    }
}

impl DepthProfile {
    /// Amplitude factor of `layer` (front = 0 → 1.0). Zero or less means the
    /// profile has no room for that layer.
    pub fn depth(self, layer: usize) -> f64 {
        match self {
            DepthProfile::Linear { step } => 1.0 - layer as f64 * step,
            DepthProfile::Tileable => TILEABLE_DEPTH.get(layer).copied().unwrap_or(0.0),
        }
    }

    /// Check that `layers` layers all keep positive depth, strictly falling
    /// from front to back.
    pub fn check_layers(self, layers: usize) -> Result<()> {
        let mut prev = f64::INFINITY;
        for layer in 0..layers {
            let d = self.depth(layer);
            if d.is_nan() || d <= 0.0 {
                return Err(Error::invalid("layers", format!("{layers} layers exceed the depth profile (layer {layer} has depth {d})")));
            }
            if d >= prev {
                return Err(Error::invalid("layers", format!("depth must fall from front to back (layer {layer})")));
            }
            prev = d;
        }
        Ok(())
    }
}

/// Synthesis settings; fixed for the duration of one generation call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Vertical rest position of the wave (px from top).
    pub baseline: f64,
    /// Pixel scale of a weight-1 harmonic.
    pub amplitude: f64,
    pub profile: DepthProfile,
    pub harmonics: Vec<Harmonic>,
    /// Force `sample[last] == sample[0]` for lossless scrolling.
    pub seamless: bool,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            baseline: 140.0,
            amplitude: 28.0,
            profile: DepthProfile::default(),
            harmonics: classic_harmonics(),
            seamless: false,
        }
    }
}

/// Produces one layer's sample column per call.
#[derive(Clone, Debug)]
pub struct WaveSynthesizer {
    cfg: WaveConfig,
}

impl WaveSynthesizer {
    pub fn new(cfg: WaveConfig) -> Result<Self> {
        ensure_finite("wave.baseline", cfg.baseline)?;
        ensure_finite("wave.amplitude", cfg.amplitude)?;
        if cfg.amplitude < 0.0 {
            return Err(Error::invalid("wave.amplitude", "must not be negative"));
        }
        if let DepthProfile::Linear { step } = cfg.profile {
            ensure_finite("wave.depth_step", step)?;
            if cfg.harmonics.is_empty() {
                return Err(Error::invalid("wave.harmonics", "at least one harmonic is required"));
            }
            for h in &cfg.harmonics {
                ensure_finite("wave.harmonics.weight", h.weight)?;
                ensure_finite("wave.harmonics.cycles", h.cycles_for(0))?;
                ensure_finite("wave.harmonics.phase_scale", h.phase_scale)?;
            }
        }
        Ok(Self { cfg })
    }

    #[inline]
    pub fn config(&self) -> &WaveConfig {
        &self.cfg
    }

    /// Depth attenuation of `layer` (front = 0 → 1.0).
    #[inline]
    pub fn depth(&self, layer: usize) -> f64 {
        self.cfg.profile.depth(layer)
    }

    /// Largest possible distance of `layer` from the baseline, in px.
    pub fn envelope(&self, layer: usize) -> f64 {
        let weights: f64 = self.partials(layer).iter().map(|h| h.weight.abs()).sum();
        self.depth(layer).max(0.0) * self.cfg.amplitude * weights
    }

    fn partials(&self, layer: usize) -> Vec<Harmonic> {
        match self.cfg.profile {
            DepthProfile::Linear { .. } => self.cfg.harmonics.clone(),
            DepthProfile::Tileable => {
                let row = TILEABLE_TABLE[layer.min(TILEABLE_TABLE.len() - 1)];
                row.iter()
                    .zip(TILEABLE_PHASE_SCALE)
                    .map(|(&(weight, cycles), phase_scale)| Harmonic::new(weight, cycles, 0.0, phase_scale))
                    .collect()
            }
        }
    }

    /// Samples for `layer`, drawing one phase from `rng` and adding `phase_shift`.
    pub fn synthesize<R>(
        &self,
        layer: usize,
        sample_count: usize,
        phase_shift: f64,
        rng: &mut R,
    ) -> Result<Vec<f64>>
    where
        R: RandomSource + ?Sized,
    {
        if sample_count < 2 {
            return Err(Error::invalid("sample_count", format!("needs at least 2 samples, got {sample_count}")));
        }
        ensure_finite("phase_shift", phase_shift)?;
        let depth = self.depth(layer);
        if depth <= 0.0 {
            return Err(Error::invalid("layer", format!("layer {layer} has no remaining depth ({depth})")));
        }
        let phase = rng.next_f64() * TAU + phase_shift;
        Ok(self.sample_column(layer, sample_count, phase))
    }

    /// Deterministic core of [`synthesize`](Self::synthesize) for a known phase.
    pub fn synthesize_with_phase(&self, layer: usize, sample_count: usize, phase: f64) -> Result<Vec<f64>> {
        if sample_count < 2 {
            return Err(Error::invalid("sample_count", format!("needs at least 2 samples, got {sample_count}")));
        }
        ensure_finite("phase", phase)?;
        Ok(self.sample_column(layer, sample_count, phase))
    }

    fn sample_column(&self, layer: usize, n: usize, phase: f64) -> Vec<f64> {
        let depth = self.depth(layer);
        let partials = self.partials(layer);
        let scale = depth * self.cfg.amplitude;

        let mut out: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                let sum: f64 = partials
                    .iter()
                    .map(|h| h.weight * sine(t * TAU * h.cycles_for(layer) + phase * h.phase_scale))
                    .sum();
                self.cfg.baseline - scale * sum
            })
            .collect();

        if self.cfg.seamless {
            out[n - 1] = out[0];
        }
        debug!(layer, samples = n, depth, seamless = self.cfg.seamless, "synthesized wave layer");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedSource, SeededSource};

    fn single(amplitude: f64) -> WaveSynthesizer {
        WaveSynthesizer::new(WaveConfig {
            baseline: 100.0,
            amplitude,
            profile: DepthProfile::Linear { step: 0.25 },
            harmonics: vec![Harmonic::new(1.0, 1.0, 0.0, 1.0)],
            seamless: false,
        })
        .unwrap()
    }

    #[test]
    fn quarter_period_steps() {
        let s = single(10.0).synthesize(0, 4, 0.0, &mut FixedSource::new(0.0)).unwrap();
        let want = [100.0, 90.0, 100.0, 110.0];
        for (got, want) in s.iter().zip(want) {
            assert!((got - want).abs() < 1e-9, "{s:?}");
        }
    }

    #[test]
    fn rejects_short_columns() {
        let w = single(10.0);
        for n in [0, 1] {
            let err = w.synthesize(0, n, 0.0, &mut FixedSource::new(0.0)).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { name: "sample_count", .. }));
        }
    }

    #[test]
    fn returns_requested_count_of_finite_values() {
        let w = WaveSynthesizer::new(WaveConfig::default()).unwrap();
        let mut rng = SeededSource::new(3);
        for layer in 0..3 {
            let s = w.synthesize(layer, 200, 0.0, &mut rng).unwrap();
            assert_eq!(s.len(), 200);
            assert!(s.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn seamless_closes_the_loop() {
        let w = WaveSynthesizer::new(WaveConfig { seamless: true, ..WaveConfig::default() }).unwrap();
        let s = w.synthesize(1, 37, 0.3, &mut SeededSource::new(11)).unwrap();
        assert_eq!(s[0].to_bits(), s[36].to_bits());
    }

    #[test]
    fn depth_falls_off_towards_the_back() {
        let w = WaveSynthesizer::new(WaveConfig::default()).unwrap();
        assert!(w.depth(0) > w.depth(1) && w.depth(1) > w.depth(2));
        let swing = |layer| {
            let s = w.synthesize_with_phase(layer, 400, 0.0).unwrap();
            s.iter().map(|v| (v - 140.0).abs()).fold(0.0, f64::max)
        };
        assert!(swing(0) > swing(2));
    }

    #[test]
    fn exhausted_depth_is_rejected() {
        let w = WaveSynthesizer::new(WaveConfig::default()).unwrap();
        assert!(w.synthesize(4, 10, 0.0, &mut FixedSource::new(0.0)).is_err());
    }

    #[test]
    fn tileable_profile_uses_integer_cycles() {
        let w = WaveSynthesizer::new(WaveConfig { profile: DepthProfile::Tileable, ..WaveConfig::default() })
            .unwrap();
        for layer in 0..5 {
            for h in w.partials(layer) {
                assert_eq!(h.cycles_for(layer).fract(), 0.0);
            }
        }
    }

    #[test]
    fn tileable_depth_falls_off_and_runs_out() {
        let w = WaveSynthesizer::new(WaveConfig { profile: DepthProfile::Tileable, seamless: true, ..WaveConfig::default() })
            .unwrap();
        assert_eq!([w.depth(0), w.depth(1), w.depth(2)], [1.0, 0.75, 0.5]);
        let swing = |layer| {
            let s = w.synthesize_with_phase(layer, 400, 0.0).unwrap();
            s.iter().map(|v| (v - 140.0).abs()).fold(0.0, f64::max)
        };
        for layer in 0..3 {
            assert!(swing(layer) <= w.envelope(layer) + 1e-9);
        }
        assert!(w.envelope(0) > w.envelope(1) && w.envelope(1) > w.envelope(2));
        assert!(w.synthesize(3, 10, 0.0, &mut FixedSource::new(0.0)).is_err());
    }

    #[test]
    fn layer_capacity_checks() {
        assert!(DepthProfile::default().check_layers(4).is_ok());
        assert!(DepthProfile::default().check_layers(5).is_err());
        assert!(DepthProfile::Tileable.check_layers(3).is_ok());
        assert!(DepthProfile::Tileable.check_layers(4).is_err());
        assert!(DepthProfile::Linear { step: 0.0 }.check_layers(2).is_err());
        assert!(DepthProfile::Linear { step: 0.0 }.check_layers(1).is_ok());
    }

    #[test]
    fn same_seed_same_column() {
        let w = WaveSynthesizer::new(WaveConfig::default()).unwrap();
        let a = w.synthesize(0, 64, 0.0, &mut SeededSource::new(99)).unwrap();
        let b = w.synthesize(0, 64, 0.0, &mut SeededSource::new(99)).unwrap();
        assert_eq!(a, b);
    }
}
