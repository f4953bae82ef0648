//! Net flow
//!
//! Arrivals into the committed stage versus departures into the done stage,
//! per period, derived from the cumulative flow table.

use super::filters::last_n_rows;
use super::resample::{diff_fill_first, resample_max};
use super::{CalculationContext, Calculator, ChartOutput};
use crate::config::{AppConfig, NetFlowConfig};
use crate::errors::{AppError, AppResult};
use crate::render::{ChartKind, ChartSpec, ChartStyle};
use crate::types::workflow::stage_names;
use crate::types::{AggregateTable, Frequency};
use crate::utils::time::day_label;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const ARRIVALS_COLUMN: &str = "arrivals";
pub const DEPARTURES_COLUMN: &str = "departures";
pub const NET_FLOW_COLUMN: &str = "net_flow";

/// Per-period flow: committed and done maxima, their differences and the
/// resulting net flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetFlowReport {
    pub frequency: Frequency,
    pub table: AggregateTable,
}

impl NetFlowReport {
    /// The charted table: `net_flow` only, trailing `window` periods
    pub fn chart_table(&self, window: Option<usize>) -> AggregateTable {
        let Some(col) = self.table.column_position(NET_FLOW_COLUMN) else {
            return AggregateTable::empty();
        };
        last_n_rows(&self.table.project(&[col]), window)
    }

    /// Period labels as `DD/MM/YYYY`, whatever the frequency
    pub fn labels(table: &AggregateTable) -> Vec<String> {
        table.index().iter().map(|start| day_label(*start)).collect()
    }

    /// Signed bar chart of the windowed net flow
    pub fn chart_spec(&self, config: &NetFlowConfig) -> ChartSpec {
        let table = self.chart_table(config.window);
        let labels = Self::labels(&table);
        ChartSpec {
            name: "net flow".to_string(),
            title: config.chart_title.clone(),
            kind: ChartKind::SignedBar,
            table,
            labels,
            x_title: "Period starting".to_string(),
            y_title: "Net flow (departures - arrivals)".to_string(),
        }
    }
}

/// Net flow calculator (`net_flow.*` settings)
pub struct NetFlowCalculator;

impl NetFlowCalculator {
    /// A configured stage binding, checked against the workflow
    fn stage_column<'a>(names: &[String], label: &str, column: Option<&'a str>) -> AppResult<&'a str> {
        match column {
            Some(column) if names.iter().any(|name| name == column) => Ok(column),
            Some(column) => Err(AppError::Config(format!(
                "{} column '{}' does not exist. Options are {:?}",
                label, column, names
            ))),
            None => Err(AppError::Config(format!("{} column is not set", label))),
        }
    }

    /// Net flow from an already loaded cumulative flow table
    pub fn from_cfd(cfd: &AggregateTable, config: &AppConfig) -> AppResult<NetFlowReport> {
        let names = stage_names(&config.workflow);
        let committed = Self::stage_column(&names, "Committed", config.committed_column.as_deref())?;
        let done = Self::stage_column(&names, "Done", config.done_column.as_deref())?;
        let positions = [committed, done]
            .iter()
            .map(|column| {
                cfd.column_position(column).ok_or_else(|| {
                    AppError::Config(format!(
                        "Column '{}' is missing from the cumulative flow data",
                        column
                    ))
                })
            })
            .collect::<AppResult<Vec<usize>>>()?;

        let frequency = config.net_flow.frequency;
        let resampled = resample_max(&cfd.project(&positions), frequency);
        let committed_values = resampled.column(committed).unwrap_or_default();
        let done_values = resampled.column(done).unwrap_or_default();

        let arrivals = diff_fill_first(&committed_values);
        let departures = diff_fill_first(&done_values);
        let rows = committed_values
            .iter()
            .zip(&done_values)
            .zip(arrivals.iter().zip(&departures))
            .map(|((c, d), (a, dep))| vec![*c, *d, *a, *dep, a - dep])
            .collect();

        let table = AggregateTable::new(
            resampled.index().to_vec(),
            vec![
                committed.to_string(),
                done.to_string(),
                ARRIVALS_COLUMN.to_string(),
                DEPARTURES_COLUMN.to_string(),
                NET_FLOW_COLUMN.to_string(),
            ],
            rows,
        )?;
        Ok(NetFlowReport { frequency, table })
    }

    /// Load the cumulative flow data and compute net flow; `None` when no
    /// cumulative flow source is configured
    pub fn calculate(ctx: &CalculationContext) -> AppResult<Option<NetFlowReport>> {
        let Some(cfd) = ctx.cumulative_flow()? else {
            debug!("Not calculating net flow as no cumulative flow data is configured");
            return Ok(None);
        };
        Self::from_cfd(&cfd, ctx.config).map(Some)
    }
}

impl Calculator for NetFlowCalculator {
    fn name(&self) -> &'static str {
        "net flow"
    }

    fn charts(&self, ctx: &CalculationContext) -> AppResult<Vec<ChartOutput>> {
        let config = &ctx.config.net_flow;
        let Some(path) = config.chart.as_ref() else {
            debug!("Not drawing net flow chart as no output is configured");
            return Ok(Vec::new());
        };
        let Some(report) = Self::calculate(ctx)? else {
            return Ok(Vec::new());
        };

        let spec = report.chart_spec(config);
        if spec.table.is_empty() {
            warn!("Cannot draw net flow chart with zero items");
            return Ok(Vec::new());
        }

        Ok(vec![ChartOutput {
            spec,
            style: ChartStyle::from_config(&ctx.config.style, config.chart_palette.as_deref()),
            path: ctx.config.output_path(path),
        }])
    }
}
