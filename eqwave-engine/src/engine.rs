//! Generation driver.
//!
//! `Engine<R>` owns a validated [`GenerationConfig`] and the injected random
//! source, and runs one full pass per [`Engine::render`]:
//!
//! 1. wave layers, back to front (synthetic harmonics or an external series)
//! 2. one smooth path per layer
//! 3. the equalizer bar set
//! 4. composition into a [`Scene`]
//!
//! The draw order above is fixed; with the same seed and config, two engines
//! produce identical scenes.

use eqwave_core::error::Result;
use eqwave_core::path::PathBuilder;
use eqwave_core::rng::RandomSource;
use eqwave_core::wave::WaveSynthesizer;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::equalizer::EqualizerGenerator;
use crate::scenes::{Layer, Scene, SceneComposer};
use crate::series::SeriesWave;

/// Phase offset added per layer index so stacked layers never align.
pub const LAYER_PHASE_STEP: f64 = 1.3;

/// Owns the configuration and random source for repeated renders.
pub struct Engine<R: RandomSource> {
    cfg: GenerationConfig,
    rng: R,
    series: Option<SeriesWave>,
}

impl<R: RandomSource> Engine<R> {
    /// Validates `cfg` up front; nothing is generated for a bad config.
    pub fn new(cfg: GenerationConfig, rng: R) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg, rng, series: None })
    }

    /// Drive the wave layers from an external series instead of harmonics.
    pub fn with_series(mut self, series: Vec<f64>) -> Result<Self> {
        self.series = Some(SeriesWave::new(&series, self.cfg.sample_count)?);
        Ok(self)
    }

    #[inline] pub fn config(&self) -> &GenerationConfig { &self.cfg }

    /// Access the random source, e.g. to inspect a sequence in tests.
    #[inline] pub fn rng_mut(&mut self) -> &mut R { &mut self.rng }

    /// One full generation pass.
    pub fn render(&mut self) -> Result<Scene> {
        let cfg = &self.cfg;
        let wave = WaveSynthesizer::new(cfg.effective_wave())?;
        let builder = PathBuilder::new(cfg.canvas.width)?;
        let composer = SceneComposer::new(cfg.canvas, cfg.preset, cfg.seamless)?;
        let bars_gen = EqualizerGenerator::new(cfg.bars, cfg.preset.params())?;

        let mut layers = Vec::with_capacity(cfg.layers.len());
        for (depth_index, spec) in cfg.layers.iter().enumerate().rev() {
            let samples = match &self.series {
                Some(series) => series.layer_samples(&wave, depth_index)?,
                None => wave.synthesize(
                    depth_index,
                    cfg.sample_count,
                    depth_index as f64 * LAYER_PHASE_STEP,
                    &mut self.rng,
                )?,
            };
            let path = builder.build(&samples)?;
            debug!(layer = %spec.name, depth_index, curves = path.curve_count(), "built wave layer");
            layers.push(Layer { depth_index, spec: spec.clone(), path });
        }

        let bars = bars_gen.generate(cfg.bars.count, cfg.canvas.width, cfg.canvas.height, &mut self.rng)?;
        Ok(composer.compose(&layers, &bars, &cfg.decoration, cfg.bars.glow))
    }

    /// Render straight to SVG markup.
    pub fn render_markup(&mut self) -> Result<String> {
        Ok(self.render()?.to_svg())
    }
}
