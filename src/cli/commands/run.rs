use super::load_config;
use crate::analysis::MetricsEngine;
use crate::errors::AppResult;
use crate::render::PlotlyRenderer;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct RunCommand {
    /// Configuration file (defaults to metrics.toml in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for chart files (overrides output.directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Evaluate open items as of this date, YYYY-MM-DD (overrides reference_date)
    #[arg(long)]
    reference_date: Option<NaiveDate>,
}

impl RunCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== Delivery metrics ===");

        let mut config = load_config(self.config.as_deref(), self.reference_date)?;
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }

        let engine = MetricsEngine::from_config(config)?;
        info!("Reference date: {}", engine.today());
        let summary = engine.run_all(&PlotlyRenderer);

        for path in &summary.charts_written {
            println!("Chart written to: {}", path.display());
        }
        if summary.charts_written.is_empty() {
            println!("No charts written");
        }
        for name in &summary.failed_calculators {
            eprintln!("Calculation failed: {} (see log for details)", name);
        }
        for name in &summary.failed_charts {
            eprintln!("Chart not written: {} (see log for details)", name);
        }
        Ok(())
    }
}
