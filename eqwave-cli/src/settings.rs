//! Config resolution: defaults, then the TOML file, then flags.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use eqwave_core::rng::seed_from_series;
use eqwave_engine::GenerationConfig;
use tracing::debug;

use crate::cli::Args;

/// Defaults, or a partial TOML file layered over them.
pub fn load(path: Option<&Path>) -> Result<GenerationConfig> {
    let Some(path) = path else {
        return Ok(GenerationConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg: GenerationConfig = toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(cfg)
}

/// Flags win over file values.
pub fn apply_overrides(cfg: &mut GenerationConfig, args: &Args) {
    if let Some(p) = args.preset {
        cfg.preset = p;
    }
    if args.seamless {
        cfg.seamless = true;
    }
    if let Some(label) = &args.label {
        cfg.decoration.label = Some(label.clone());
    }
    if args.no_label {
        cfg.decoration.label = None;
    }
    if args.tracer {
        cfg.decoration.tracer = true;
    }
    if let Some(n) = args.bars {
        cfg.bars.count = n;
    }
    if let Some(n) = args.samples {
        cfg.sample_count = n;
    }
    if let Some(w) = args.width {
        cfg.canvas.width = w;
    }
    if let Some(h) = args.height {
        cfg.canvas.height = h;
    }
}

/// Load, merge and validate.
pub fn resolve(args: &Args) -> Result<GenerationConfig> {
    let mut cfg = load(args.config.as_deref())?;
    apply_overrides(&mut cfg, args);
    cfg.validate().context("validating configuration")?;
    Ok(cfg)
}

/// Explicit seed, else one derived from the series, else the clock.
pub fn resolve_seed(explicit: Option<u64>, series: Option<&[f64]>) -> u64 {
    explicit.or_else(|| series.map(seed_from_series)).unwrap_or_else(clock_seed)
}

fn clock_seed() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use eqwave_engine::Preset;
    use std::io::Write;

    fn config_file(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("eqwave").chain(extra.iter().copied())).unwrap()
    }

    #[test]
    fn no_file_gives_defaults() {
        assert_eq!(resolve(&args(&[])).unwrap(), GenerationConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let f = config_file("preset = \"calm\"\nsample_count = 64\n\n[bars]\ncount = 24\n");
        let path = f.path().to_str().unwrap();
        let cfg = resolve(&args(&["--config", path])).unwrap();
        assert_eq!(cfg.preset, Preset::Calm);
        assert_eq!(cfg.sample_count, 64);
        assert_eq!(cfg.bars.count, 24);
        assert_eq!(cfg.canvas, GenerationConfig::default().canvas);
    }

    #[test]
    fn flags_override_file() {
        let f = config_file("[bars]\ncount = 24\n\n[decoration]\nlabel = \"FROM FILE\"\n");
        let path = f.path().to_str().unwrap();
        let cfg = resolve(&args(&["--config", path, "--bars", "8", "--preset", "hyper", "--no-label"])).unwrap();
        assert_eq!(cfg.bars.count, 8);
        assert_eq!(cfg.preset, Preset::Hyper);
        assert_eq!(cfg.decoration.label, None);
    }

    #[test]
    fn invalid_merged_config_is_rejected() {
        let f = config_file("[canvas]\nwidth = -5.0\nheight = 280.0\n");
        let path = f.path().to_str().unwrap();
        assert!(resolve(&args(&["--config", path])).is_err());
        assert!(resolve(&args(&["--samples", "1"])).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let f = config_file("bars = [not toml");
        assert!(load(Some(f.path())).is_err());
    }

    #[test]
    fn seed_precedence() {
        let series = [1.0, 2.0, 3.0];
        assert_eq!(resolve_seed(Some(5), Some(&series)), 5);
        assert_eq!(resolve_seed(None, Some(&series)), seed_from_series(&series));
    }
}
