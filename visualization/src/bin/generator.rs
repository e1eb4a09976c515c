//! Dashboard chart generator
//!
//! Renders the five access statistics charts from a stats/records JSON file,
//! or from generated sample records, into an output directory.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use aicp::config::AppConfig;
use aicp::{logging, AccessStats};
use aicp_visualization::{
    data::{load_stats, sample_records},
    export::{export_dashboard, register_font_file},
    ChartRenderer, ChartStyle, DrawOutcome, ImageFormat, Theme,
};

#[derive(Parser, Debug)]
#[command(name = "aicp-charts", version, about = "Render the access statistics dashboard")]
struct Cli {
    /// JSON file with access stats or an array of access records
    #[arg(short, long, conflicts_with = "sample")]
    stats: Option<PathBuf>,

    /// Generate this many sample records instead of reading a file
    #[arg(long, default_value_t = 200)]
    sample: usize,

    /// Configuration file (defaults to ./aicp.toml when present)
    #[arg(short, long, env = "AICP_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory; overrides `charts.output_dir`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// `svg` or `png`; overrides `charts.format`
    #[arg(short, long)]
    format: Option<String>,

    /// `light` or `dark`; overrides `charts.theme`
    #[arg(long)]
    theme: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init(&config.logging);

    let charts = &config.charts;
    let format: ImageFormat = cli.format.as_deref().unwrap_or(&charts.format).parse()?;
    let theme: Theme = cli.theme.as_deref().unwrap_or(&charts.theme).parse()?;
    let output_dir = cli.output.clone().unwrap_or_else(|| charts.output_dir.clone());

    if let Some(font) = &charts.font {
        register_font_file(font).with_context(|| format!("registering font {}", font.display()))?;
    } else if format == ImageFormat::Png {
        tracing::warn!("no charts.font configured; PNG text may fail to render");
    }

    let stats = match &cli.stats {
        Some(path) => load_stats(path).with_context(|| format!("reading stats {}", path.display()))?,
        None => {
            tracing::info!(records = cli.sample, "using generated sample records");
            AccessStats::collect_utc(&sample_records(cli.sample, 7, Utc::now()))
        }
    };

    let renderer = ChartRenderer::new(ChartStyle::for_theme(theme));
    let written = export_dashboard(
        &renderer,
        &stats,
        &output_dir,
        format,
        (charts.width, charts.height),
    )?;

    println!("Access dashboard ({} records)", stats.total);
    for (path, outcome) in &written {
        let note = match outcome {
            DrawOutcome::Drawn => "",
            DrawOutcome::EmptyState => " (no data)",
            DrawOutcome::Skipped => " (skipped)",
        };
        println!("  {}{}", path.display(), note);
    }

    Ok(())
}
