//! eqwave core: seeded randomness, waveform synthesis and path smoothing.
//!
//! Features
//! - `fast-math`: polynomial sine in the harmonic sum (slightly different output bits)
//!
//! Modules
//! - [`rng`]    : `RandomSource` trait + seeded / fixed / sequence sources
//! - [`error`]  : shared error taxonomy (`InvalidParameter`, `UpstreamUnavailable`, `WriteFailure`)
//! - [`math`]   : math backend, rounding, markup number formatting
//! - [`easing`] : cubic-bezier timing curves (`keySplines`)
//! - [`wave`]   : `WaveSynthesizer` (summed harmonics, depth falloff, seamless tiling)
//! - [`path`]   : `PathBuilder` (midpoint-quadratic smoothing)
//!
//! Design
//! - Every random draw goes through an injected `RandomSource`
//! - Pure functions of their inputs otherwise; no global state

pub mod easing;
pub mod error;
pub mod math;
pub mod path;
pub mod rng;
pub mod wave;

pub use error::{Error, Result};

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::easing::{KeySpline, EASE_IN_OUT, EASE_IN_SHARP, EASE_OUT_SNAP, EASE_SINE, LINEAR};
    pub use crate::error::{Error, Result};
    pub use crate::math::{clamp, fmt_num, fmt_secs, join_nums, lerp, round_to, TAU};
    pub use crate::path::{PathBuilder, PathData, PathSegment};
    pub use crate::rng::{seed_from_series, FixedSource, RandomSource, SeededSource, SequenceSource};
    pub use crate::wave::{classic_harmonics, DepthProfile, Harmonic, WaveConfig, WaveSynthesizer};
}

#[cfg(test)]
mod smoke {

    #[test]
    fn prelude_exists() {
        use crate::prelude::*;
        let mut rng = SeededSource::new(1);
        let wave = WaveSynthesizer::new(WaveConfig::default()).unwrap();
        let samples = wave.synthesize(0, 16, 0.0, &mut rng).unwrap();
        let path = PathBuilder::new(960.0).unwrap().build(&samples).unwrap();
        assert_eq!(path.curve_count(), 15);
    }
}
