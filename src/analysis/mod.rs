//! Delivery metric calculations
//!
//! Each metric is a [`Calculator`]: it fetches its inputs through the
//! [`CalculationContext`], shapes them into a table and describes the charts
//! it wants drawn. The [`MetricsEngine`] runs every calculator in isolation so
//! a failing or empty metric never stops the others.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use delivery_metrics::analysis::MetricsEngine;
//! use delivery_metrics::config::AppConfig;
//! use delivery_metrics::errors::AppResult;
//! use delivery_metrics::render::PlotlyRenderer;
//!
//! fn example() -> AppResult<()> {
//!     let config = AppConfig::load(None)?;
//!     let engine = MetricsEngine::from_config(config)?;
//!
//!     // Individual metrics
//!     let defects = engine.defects()?;
//!     let waste = engine.waste()?;
//!
//!     // Everything configured, written as Plotly JSON
//!     let summary = engine.run_all(&PlotlyRenderer);
//!     println!("{} charts written", summary.charts_written.len());
//!     Ok(())
//! }
//! ```

pub mod bucketing;
pub mod defects;
pub mod filters;
pub mod net_flow;
pub mod reports;
pub mod resample;
pub mod waste;

pub use defects::{DefectDimension, DefectRecord, DefectsCalculator, DefectsReport};
pub use net_flow::{NetFlowCalculator, NetFlowReport};
pub use reports::{OutputFormat, ReportFormatter};
pub use waste::{WasteCalculator, WasteReport, WithdrawnIssue};

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::render::{ChartRenderer, ChartSpec, ChartStyle};
use crate::source::{read_cfd_csv, IssueSource, JsonIssueSource, StaticIssueSource};
use crate::types::AggregateTable;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

/// Everything a calculator may read during one run
pub struct CalculationContext<'a> {
    pub config: &'a AppConfig,
    pub source: &'a dyn IssueSource,
    /// End date for items that are still open
    pub today: NaiveDate,
}

impl CalculationContext<'_> {
    /// Cumulative flow table from `source.cfd`, if one is configured
    pub fn cumulative_flow(&self) -> AppResult<Option<AggregateTable>> {
        self.config
            .source
            .cfd
            .as_deref()
            .map(read_cfd_csv)
            .transpose()
    }
}

/// A chart a calculator wants drawn
#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub spec: ChartSpec,
    pub style: ChartStyle,
    pub path: PathBuf,
}

/// One metric calculation
pub trait Calculator {
    fn name(&self) -> &'static str;

    /// Charts to draw; empty when the metric is not configured or produced no
    /// data
    fn charts(&self, ctx: &CalculationContext) -> AppResult<Vec<ChartOutput>>;
}

/// Outcome of [`MetricsEngine::run_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub charts_written: Vec<PathBuf>,
    /// Calculators that returned an error
    pub failed_calculators: Vec<String>,
    /// Charts the renderer could not write
    pub failed_charts: Vec<String>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failed_calculators.is_empty() && self.failed_charts.is_empty()
    }
}

/// Runs the metric calculators against one configuration and issue source
pub struct MetricsEngine {
    config: AppConfig,
    source: Box<dyn IssueSource>,
    today: NaiveDate,
}

impl MetricsEngine {
    pub fn new(config: AppConfig, source: Box<dyn IssueSource>) -> Self {
        let today = config.today();
        Self {
            config,
            source,
            today,
        }
    }

    /// Engine reading issues from the JSON export named in `source.issues`.
    ///
    /// Without an export every query returns no issues.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let source: Box<dyn IssueSource> = match config.source.issues.as_deref() {
            Some(path) => Box::new(JsonIssueSource::from_path(path)?),
            None => Box::new(StaticIssueSource::default()),
        };
        Ok(Self::new(config, source))
    }

    /// Replace the reference date used for open items
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn context(&self) -> CalculationContext<'_> {
        CalculationContext {
            config: &self.config,
            source: self.source.as_ref(),
            today: self.today,
        }
    }

    pub fn defects(&self) -> AppResult<Option<DefectsReport>> {
        DefectsCalculator::calculate(&self.context())
    }

    pub fn net_flow(&self) -> AppResult<Option<NetFlowReport>> {
        NetFlowCalculator::calculate(&self.context())
    }

    pub fn waste(&self) -> AppResult<Option<WasteReport>> {
        WasteCalculator::calculate(&self.context())
    }

    /// All calculators, in run order
    pub fn calculators() -> Vec<Box<dyn Calculator>> {
        vec![
            Box::new(DefectsCalculator),
            Box::new(NetFlowCalculator),
            Box::new(WasteCalculator),
        ]
    }

    /// Run every calculator and render the charts they produce.
    ///
    /// Errors are logged and recorded in the summary; they never abort the
    /// remaining calculators or charts.
    pub fn run_all(&self, renderer: &dyn ChartRenderer) -> RunSummary {
        let ctx = self.context();
        let mut summary = RunSummary::default();

        for calculator in Self::calculators() {
            let charts = match calculator.charts(&ctx) {
                Ok(charts) => charts,
                Err(e) => {
                    error!("{} calculation failed: {}", calculator.name(), e);
                    summary.failed_calculators.push(calculator.name().to_string());
                    continue;
                }
            };

            for chart in charts {
                match renderer.render(&chart.spec, &chart.style, &chart.path) {
                    Ok(()) => summary.charts_written.push(chart.path),
                    Err(e) => {
                        error!(
                            "Failed to write {} chart to {}: {}",
                            chart.spec.name,
                            chart.path.display(),
                            e
                        );
                        summary.failed_charts.push(chart.spec.name);
                    }
                }
            }
        }

        info!(
            "Wrote {} charts ({} calculators failed, {} charts failed)",
            summary.charts_written.len(),
            summary.failed_calculators.len(),
            summary.failed_charts.len()
        );
        summary
    }
}
