//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;
use eqwave_engine::Preset;

#[derive(Parser, Debug)]
#[command(name = "eqwave")]
#[command(version, about = "Procedural equalizer + wave SVG banner generator", long_about = None)]
pub struct Args {
    /// TOML file with a (partial) generation config
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tempo/amplitude preset: calm, classic, hyper
    #[arg(short, long)]
    pub preset: Option<Preset>,

    /// Seed for the random source (default: derived from the series, else the clock)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Lossless horizontal scrolling
    #[arg(long)]
    pub seamless: bool,

    /// Centered label text
    #[arg(short, long, conflicts_with = "no_label")]
    pub label: Option<String>,

    /// Leave the banner without a label
    #[arg(long)]
    pub no_label: bool,

    /// Add a mark riding the front wave
    #[arg(long)]
    pub tracer: bool,

    /// Number of equalizer bars
    #[arg(long)]
    pub bars: Option<usize>,

    /// Samples per wave layer
    #[arg(long)]
    pub samples: Option<usize>,

    /// Canvas width in px
    #[arg(long)]
    pub width: Option<f64>,

    /// Canvas height in px
    #[arg(long)]
    pub height: Option<f64>,

    /// Output file
    #[arg(short, long, default_value = "output.svg")]
    pub out: PathBuf,

    /// Write the SVG to stdout instead of `--out`
    #[arg(long)]
    pub stdout: bool,

    /// Drive the waves from this GitHub user's contribution calendar
    #[arg(long, value_name = "USER")]
    pub github_user: Option<String>,

    /// Token for the GitHub GraphQL API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Drive the waves from a URL serving a JSON array of numbers
    #[arg(long, value_name = "URL", conflicts_with = "github_user")]
    pub series_url: Option<String>,

    /// Upstream fetch timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}
