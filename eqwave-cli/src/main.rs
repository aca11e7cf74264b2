//! eqwave: render one animated equalizer + wave SVG banner.

mod cli;
mod output;
mod settings;
mod upstream;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use eqwave_core::rng::SeededSource;
use eqwave_engine::Engine;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::output::Sink;
use crate::upstream::UpstreamSource;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let cfg = settings::resolve(&args)?;

    let series = match UpstreamSource::from_args(&args)? {
        Some(source) => Some(
            source
                .fetch(Duration::from_secs(args.timeout_secs))
                .await
                .with_context(|| format!("fetching series from {source}"))?,
        ),
        None => None,
    };

    let seed = settings::resolve_seed(args.seed, series.as_deref());
    info!(seed, preset = %cfg.preset, seamless = cfg.seamless, "generating banner");

    let mut engine = Engine::new(cfg, SeededSource::new(seed))?;
    if let Some(series) = series {
        engine = engine.with_series(series)?;
    }
    let svg = engine.render_markup().context("generating banner")?;

    let sink = Sink::from_args(&args);
    sink.write(&svg)?;
    info!(dest = %sink, bytes = svg.len(), "banner written");
    Ok(())
}

/// Logs go to stderr so `--stdout` output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
