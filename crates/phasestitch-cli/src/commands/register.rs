use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use phasestitch_core::config::GridLayout;
use phasestitch_core::io::image_io::{load_image, save_image, ChannelSelection};
use phasestitch_core::registration::{phase_correlation_map, Registration};
use phasestitch_core::score::CrossCorrelationResult;
use serde::Serialize;
use tracing::debug;

use crate::summary::print_registration_summary;

#[derive(Args)]
pub struct RegisterArgs {
    /// Reference tile
    pub a: PathBuf,

    /// Tile to place relative to the reference
    pub b: PathBuf,

    /// Grid layout config (TOML); command-line flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of PCM peaks to verify
    #[arg(long)]
    pub peaks: Option<usize>,

    /// Skip mirror extension and edge windowing
    #[arg(long)]
    pub no_window: bool,

    /// Worker threads (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Minimum overlap, as a fraction of the smaller tile, to score a shift
    #[arg(long)]
    pub min_overlap: Option<f64>,

    /// Only take PCM peaks that are local maxima
    #[arg(long)]
    pub local_maxima: bool,

    /// Channels to combine for RGB images
    #[arg(long, default_value = "average")]
    pub channel: ChannelSelection,

    /// Save the phase correlation matrix as an image
    #[arg(long)]
    pub pcm_out: Option<PathBuf>,

    /// Write the ranked results as TOML
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    a: String,
    b: String,
    threshold_r: f64,
    accepted: bool,
    results: &'a [CrossCorrelationResult<2>],
}

pub fn run(args: &RegisterArgs) -> Result<()> {
    let layout = build_layout(args)?;

    let a = load_image(&args.a, args.channel)
        .with_context(|| format!("Failed to load {}", args.a.display()))?;
    let b = load_image(&args.b, args.channel)
        .with_context(|| format!("Failed to load {}", args.b.display()))?;

    let registration = Registration::new(layout.registration.clone())?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Correlating tiles...");

    let results = registration.register(&a, &b)?;

    if let Some(ref path) = args.pcm_out {
        pb.set_message("Saving phase correlation matrix...");
        let pcm = phase_correlation_map(&a, &b, registration.config(), registration.pool())?;
        save_image(&pcm, path)
            .with_context(|| format!("Failed to save PCM to {}", path.display()))?;
    }
    pb.finish_and_clear();

    print_registration_summary(&args.a, &args.b, &layout, &results);

    if let Some(ref path) = args.report {
        write_report(path, args, &layout, &results)?;
        println!("Report saved to {}", path.display());
    }
    if let Some(ref path) = args.pcm_out {
        println!("PCM saved to {}", path.display());
    }

    Ok(())
}

fn build_layout(args: &RegisterArgs) -> Result<GridLayout> {
    let mut layout = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid grid layout config")?
    } else {
        GridLayout::default()
    };

    let reg = &mut layout.registration;
    if let Some(peaks) = args.peaks {
        reg.check_peaks = peaks;
    }
    if args.no_window {
        reg.windowing = false;
    }
    if let Some(threads) = args.threads {
        reg.threads = Some(threads);
    }
    if let Some(fraction) = args.min_overlap {
        reg.min_overlap_fraction = fraction;
    }
    if args.local_maxima {
        reg.local_maxima_only = true;
    }

    layout.validate()?;
    debug!(?layout, "effective grid layout");
    Ok(layout)
}

fn write_report(
    path: &Path,
    args: &RegisterArgs,
    layout: &GridLayout,
    results: &[CrossCorrelationResult<2>],
) -> Result<()> {
    let report = Report {
        a: args.a.display().to_string(),
        b: args.b.display().to_string(),
        threshold_r: layout.threshold_r,
        accepted: results.first().is_some_and(|best| layout.accepts(best)),
        results,
    };
    let toml_str = toml::to_string_pretty(&report)?;
    std::fs::write(path, toml_str)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
