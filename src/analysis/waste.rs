//! Waste: work withdrawn before completion
//!
//! A resolved issue counts as withdrawn when the status it left in its final
//! transition maps to a stage other than backlog or done. Withdrawals are
//! counted per period of their resolution date and per stage.

use super::filters::last_n_rows;
use super::resample::count_by_period;
use super::{CalculationContext, Calculator, ChartOutput};
use crate::config::{AppConfig, WasteConfig};
use crate::errors::{AppError, AppResult};
use crate::render::{ChartKind, ChartSpec, ChartStyle};
use crate::types::workflow::stage_names;
use crate::types::{AggregateTable, Frequency, Issue, StatusLookup};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A withdrawn issue and the stage it was withdrawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawnIssue {
    pub key: String,
    /// Raw tracker status held before the final transition
    pub last_status: Option<String>,
    /// Workflow stage of `last_status`; `None` when it is not mapped
    pub stage: Option<String>,
    pub resolution: String,
    pub withdrawn: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteReport {
    pub frequency: Frequency,
    pub withdrawn: Vec<WithdrawnIssue>,
    /// Withdrawals per period and stage, over the stages between backlog and
    /// done
    pub breakdown: AggregateTable,
}

impl WasteReport {
    /// Withdrawn issues whose status is not mapped to any stage
    pub fn unclassified(&self) -> usize {
        self.withdrawn.iter().filter(|w| w.stage.is_none()).count()
    }

    /// Stacked chart of withdrawals per period and stage
    pub fn chart_spec(&self, config: &WasteConfig) -> ChartSpec {
        let labels = self
            .breakdown
            .index()
            .iter()
            .map(|start| self.frequency.label(*start))
            .collect();
        let x_title = match self.frequency {
            Frequency::MonthStart => "Month",
            _ => "Period starting",
        };
        ChartSpec {
            name: "waste".to_string(),
            title: config.chart_title.clone(),
            kind: ChartKind::StackedBar {
                reverse_legend: false,
                pad_odd_palette: false,
            },
            table: self.breakdown.clone(),
            labels,
            x_title: x_title.to_string(),
            y_title: "Number of items".to_string(),
        }
    }
}

/// Waste calculator (`waste.*` settings)
pub struct WasteCalculator;

impl WasteCalculator {
    fn require_stage<'a>(names: &[String], label: &str, column: Option<&'a str>) -> AppResult<&'a str> {
        match column {
            Some(column) if names.iter().any(|name| name == column) => Ok(column),
            Some(column) => Err(AppError::Config(format!(
                "{} column '{}' does not exist. Options are {:?}",
                label, column, names
            ))),
            None => Err(AppError::Config(format!(
                "{} column must be set to calculate waste",
                label
            ))),
        }
    }

    /// Reduce resolved issues to withdrawals, dropping those that left from
    /// the backlog or done stage
    pub fn withdrawals(
        issues: &[Issue],
        lookup: &StatusLookup,
        backlog: &str,
        done: &str,
    ) -> Vec<WithdrawnIssue> {
        issues
            .iter()
            .filter_map(|issue| {
                // Unresolved issues have not been withdrawn
                let resolution = issue.resolution.as_ref()?;
                let Some(withdrawn) = issue.resolved_date() else {
                    warn!("Issue {} is resolved but has no resolution date", issue.key);
                    return None;
                };

                let last_status = issue.last_status_before_resolution();
                let stage = last_status
                    .and_then(|status| lookup.stage_for(status))
                    .map(str::to_string);
                if stage.is_none() {
                    warn!(
                        "Issue {} transitioned from unknown status {:?}",
                        issue.key, last_status
                    );
                }
                if matches!(stage.as_deref(), Some(name) if name == backlog || name == done) {
                    return None;
                }

                Some(WithdrawnIssue {
                    key: issue.key.clone(),
                    last_status: last_status.map(str::to_string),
                    stage,
                    resolution: resolution.clone(),
                    withdrawn,
                })
            })
            .collect()
    }

    /// Withdrawals per period, one column per stage strictly between the
    /// backlog and done stages (in workflow order)
    pub fn breakdown(
        withdrawn: &[WithdrawnIssue],
        config: &AppConfig,
        backlog: &str,
        done: &str,
    ) -> AggregateTable {
        let columns: Vec<String> = stage_names(&config.workflow)
            .into_iter()
            .filter(|name| name != backlog && name != done)
            .collect();
        let events = withdrawn.iter().map(|w| (w.withdrawn, w.stage.as_deref()));
        last_n_rows(
            &count_by_period(events, &columns, config.waste.frequency),
            config.waste.window,
        )
    }

    /// Fetch and classify withdrawals; `None` when no query is configured
    pub fn calculate(ctx: &CalculationContext) -> AppResult<Option<WasteReport>> {
        let config = ctx.config;
        let Some(query) = config.waste.query.as_deref().filter(|q| !q.trim().is_empty()) else {
            debug!("Not calculating waste chart data as no query specified");
            return Ok(None);
        };

        let names = stage_names(&config.workflow);
        let backlog = Self::require_stage(&names, "Backlog", config.backlog_column.as_deref())?;
        let done = Self::require_stage(&names, "Done", config.done_column.as_deref())?;

        let issues = ctx.source.find_issues(query)?;
        let lookup = StatusLookup::from_stages(&config.workflow);
        let withdrawn = Self::withdrawals(&issues, &lookup, backlog, done);
        let breakdown = Self::breakdown(&withdrawn, config, backlog, done);

        Ok(Some(WasteReport {
            frequency: config.waste.frequency,
            withdrawn,
            breakdown,
        }))
    }
}

impl Calculator for WasteCalculator {
    fn name(&self) -> &'static str {
        "waste"
    }

    fn charts(&self, ctx: &CalculationContext) -> AppResult<Vec<ChartOutput>> {
        let config = &ctx.config.waste;
        let Some(report) = Self::calculate(ctx)? else {
            return Ok(Vec::new());
        };
        let Some(path) = config.chart.as_ref() else {
            debug!("No output file specified for waste chart");
            return Ok(Vec::new());
        };
        if report.withdrawn.is_empty() || report.breakdown.is_empty() {
            warn!("Cannot draw waste chart with zero items");
            return Ok(Vec::new());
        }

        Ok(vec![ChartOutput {
            spec: report.chart_spec(config),
            style: ChartStyle::from_config(&ctx.config.style, config.chart_palette.as_deref()),
            path: ctx.config.output_path(path),
        }])
    }
}
