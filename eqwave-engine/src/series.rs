//! External numeric series as an alternative wave source.
//!
//! An upstream series (daily activity counts, say) is resampled to the sample
//! count, centered on its mean and scaled into `[-1, 1]`. Layers then read
//! `baseline - depth(layer) * amplitude * normalized[i]`, so the depth falloff
//! of synthetic waves still applies.

use eqwave_core::error::{Error, Result};
use eqwave_core::math::lerp;
use eqwave_core::wave::WaveSynthesizer;
use tracing::debug;

/// Linear resample of `series` to exactly `n` points (both ends kept).
pub fn resample(series: &[f64], n: usize) -> Result<Vec<f64>> {
    if series.is_empty() {
        return Err(Error::invalid("series", "upstream series is empty"));
    }
    if n < 2 {
        return Err(Error::invalid("sample_count", format!("needs at least 2 samples, got {n}")));
    }
    if let Some(bad) = series.iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid("series", format!("non-finite value {bad}")));
    }
    if series.len() == 1 {
        return Ok(vec![series[0]; n]);
    }
    let last = (series.len() - 1) as f64;
    Ok((0..n)
        .map(|i| {
            let pos = i as f64 / (n - 1) as f64 * last;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(series.len() - 1);
            lerp(series[lo], series[hi], pos - lo as f64)
        })
        .collect())
}

/// Center on the mean and scale so the largest deviation is 1. Flat input → zeros.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let peak = values.iter().map(|v| (v - mean).abs()).fold(0.0, f64::max);
    if peak <= f64::EPSILON {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / peak).collect()
}

/// A series prepared for one sample count.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesWave {
    shape: Vec<f64>,
}

impl SeriesWave {
    pub fn new(series: &[f64], sample_count: usize) -> Result<Self> {
        let shape = normalize(&resample(series, sample_count)?);
        debug!(points = series.len(), samples = sample_count, "prepared series wave");
        Ok(Self { shape })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Samples for `layer` using the synthesizer's baseline, amplitude and depth.
    pub fn layer_samples(&self, wave: &WaveSynthesizer, layer: usize) -> Result<Vec<f64>> {
        let depth = wave.depth(layer);
        if depth <= 0.0 {
            return Err(Error::invalid("layer", format!("layer {layer} has no remaining depth ({depth})")));
        }
        let cfg = wave.config();
        let scale = depth * cfg.amplitude;
        let mut out: Vec<f64> = self.shape.iter().map(|s| cfg.baseline - scale * s).collect();
        if cfg.seamless {
            if let Some(first) = out.first().copied() {
                if let Some(last) = out.last_mut() {
                    *last = first;
                }
            }
        }
        Ok(out)
    }
}
