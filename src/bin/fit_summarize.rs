//! Summarize FIT files, printing one JSON summary per line.
//!
//! Usage: `fit-summarize [--device NAME] [--config PATH] FILE...`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use log::info;

use fit_summary::{decode_activity, SummaryConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate an aggregated summary of FIT activity files", long_about = None)]
struct Cli {
    /// FIT files to summarize
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    inputs: Vec<PathBuf>,

    /// Telemetry device name, stored as the `device` tag. Overrides a
    /// `device` tag from the config; "unknown" when neither is given
    #[arg(long)]
    device: Option<String>,

    /// JSON summary config (measurements, correlates, tags)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<SummaryConfig> {
    let config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            SummaryConfig::from_json(&json)?
        }
        None => SummaryConfig::default(),
    };
    Ok(tag_device(config, cli.device.as_deref()))
}

fn tag_device(config: SummaryConfig, device: Option<&str>) -> SummaryConfig {
    match device {
        Some(device) => config.with_tag("device", device),
        None if config.tags.contains_key("device") => config,
        None => config.with_tag("device", "unknown"),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    for path in &cli.inputs {
        let bytes = fs::read(path).with_context(|| format!("open {}", path.display()))?;
        let activity =
            decode_activity(&bytes).with_context(|| format!("decode {}", path.display()))?;
        let summary = activity
            .summarize(&config)
            .with_context(|| format!("summarize {}", path.display()))?;

        info!(
            "[Summary] {}: {} measurements",
            path.display(),
            summary.measurements.len()
        );
        println!("{}", summary.to_json()?);
    }

    Ok(())
}
