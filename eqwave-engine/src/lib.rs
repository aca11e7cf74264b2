//! eqwave engine: config, bars, scene composition and markup.
//!
//! Crate layout:
//! - [`config`]    : `GenerationConfig`, presets, layer table, decoration
//! - [`nodes`]     : scene node model (shapes, resources, animation tracks)
//! - [`equalizer`] : zoned bar generator with glitch spikes
//! - [`series`]    : external numeric series as a wave source
//! - [`scenes`]    : `SceneComposer` and the finished `Scene`
//! - [`svg`]       : SVG/SMIL markup writer
//! - [`engine`]    : `Engine<R>` driver running one full generation pass
//!
//! Everything is synchronous and single-threaded. Randomness comes only from
//! the `RandomSource` handed to the engine.

pub mod config;
pub mod engine;
pub mod equalizer;
pub mod nodes;
pub mod scenes;
pub mod series;
pub mod svg;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use config::{GenerationConfig, Preset, PresetParams};
pub use engine::Engine;
pub use equalizer::{Bar, EqualizerGenerator, Zone};
pub use scenes::{Layer, Scene, SceneComposer};
pub use series::SeriesWave;
