//! Defect concentration
//!
//! Counts the defects open in each month, broken down by priority, type and
//! environment. An issue is open from its creation date until its resolution
//! date (or the reference date when unresolved) and counts in every month in
//! between.
//!
//! ## Chart shaping
//!
//! Each dimension's monthly counts go through the same filters, in order:
//! known values (`values`), trailing window (`defects.window`), sort by the
//! latest month (type and environment only), then the "Others" threshold.

use super::bucketing::count_by_month;
use super::filters::{collapse_below_threshold, last_n_rows, select_columns, sort_columns_by_last_row};
use super::{CalculationContext, Calculator, ChartOutput};
use crate::config::{DefectsConfig, DimensionConfig};
use crate::errors::AppResult;
use crate::render::{ChartKind, ChartSpec, ChartStyle};
use crate::types::{AggregateTable, Issue, Item};
use crate::utils::time::month_label;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Breakdown dimension for defect charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectDimension {
    Priority,
    Type,
    Environment,
}

impl DefectDimension {
    pub const ALL: [DefectDimension; 3] = [
        DefectDimension::Priority,
        DefectDimension::Type,
        DefectDimension::Environment,
    ];

    /// This dimension's settings
    pub fn config<'a>(&self, config: &'a DefectsConfig) -> &'a DimensionConfig {
        match self {
            DefectDimension::Priority => &config.priority,
            DefectDimension::Type => &config.issue_type,
            DefectDimension::Environment => &config.environment,
        }
    }

    /// Priority keeps its configured order; the others are ranked by volume
    fn sorted_by_latest(&self) -> bool {
        !matches!(self, DefectDimension::Priority)
    }
}

impl fmt::Display for DefectDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefectDimension::Priority => write!(f, "priority"),
            DefectDimension::Type => write!(f, "type"),
            DefectDimension::Environment => write!(f, "environment"),
        }
    }
}

/// One defect, reduced to what the breakdowns need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectRecord {
    pub key: String,
    pub created: NaiveDate,
    pub resolved: Option<NaiveDate>,
    pub priority: Option<String>,
    pub issue_type: Option<String>,
    pub environment: Option<String>,
}

impl DefectRecord {
    pub fn from_issue(issue: &Issue, config: &DefectsConfig) -> Self {
        let value = |dimension: &DimensionConfig| {
            dimension
                .field
                .as_deref()
                .and_then(|field| issue.field_value(field))
                .map(str::to_string)
        };
        Self {
            key: issue.key.clone(),
            created: issue.created_date(),
            resolved: issue.resolved_date(),
            priority: value(&config.priority),
            issue_type: value(&config.issue_type),
            environment: value(&config.environment),
        }
    }

    fn category(&self, dimension: DefectDimension) -> Option<String> {
        match dimension {
            DefectDimension::Priority => self.priority.clone(),
            DefectDimension::Type => self.issue_type.clone(),
            DefectDimension::Environment => self.environment.clone(),
        }
    }
}

/// Result of the defects calculation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefectsReport {
    pub records: Vec<DefectRecord>,
}

impl DefectsReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Interval items for one dimension.
    ///
    /// Records resolved before they were created cannot be bucketed and are
    /// skipped with a warning.
    pub fn items(&self, dimension: DefectDimension) -> Vec<Item> {
        self.records
            .iter()
            .filter_map(|record| {
                let item = Item::new(
                    record.key.clone(),
                    record.category(dimension),
                    record.created,
                    record.resolved,
                );
                if item.is_none() {
                    warn!(
                        "Skipping {}: resolved {:?} before it was created {}",
                        record.key, record.resolved, record.created
                    );
                }
                item
            })
            .collect()
    }

    /// Monthly breakdown for one dimension with all chart filters applied
    pub fn breakdown(
        &self,
        dimension: DefectDimension,
        config: &DefectsConfig,
        today: NaiveDate,
    ) -> AggregateTable {
        let dimension_config = dimension.config(config);
        let monthly = count_by_month(&self.items(dimension), today);
        let mut breakdown = last_n_rows(
            &select_columns(&monthly, &dimension_config.values),
            config.window,
        );
        if dimension.sorted_by_latest() {
            breakdown = sort_columns_by_last_row(&breakdown, false);
        }
        collapse_below_threshold(&breakdown, dimension_config.threshold)
    }

    /// Stacked monthly chart for one dimension
    pub fn chart_spec(
        &self,
        dimension: DefectDimension,
        config: &DefectsConfig,
        today: NaiveDate,
    ) -> ChartSpec {
        let table = self.breakdown(dimension, config, today);
        let labels = table.index().iter().map(|d| month_label(*d)).collect();
        ChartSpec {
            name: format!("defects by {}", dimension),
            title: dimension.config(config).chart_title.clone(),
            kind: ChartKind::StackedBar {
                reverse_legend: true,
                pad_odd_palette: true,
            },
            table,
            labels,
            x_title: "Month".to_string(),
            y_title: "Number of items".to_string(),
        }
    }
}

/// Defect concentration calculator (`defects.*` settings)
pub struct DefectsCalculator;

impl DefectsCalculator {
    /// Fetch the defects; `None` when no query is configured
    pub fn calculate(ctx: &CalculationContext) -> AppResult<Option<DefectsReport>> {
        let config = &ctx.config.defects;
        let Some(query) = config.query.as_deref().filter(|q| !q.trim().is_empty()) else {
            debug!("Not calculating defects chart data as no query specified");
            return Ok(None);
        };

        let records = ctx
            .source
            .find_issues(query)?
            .iter()
            .map(|issue| DefectRecord::from_issue(issue, config))
            .collect();
        Ok(Some(DefectsReport { records }))
    }

    fn chart(
        report: &DefectsReport,
        dimension: DefectDimension,
        ctx: &CalculationContext,
    ) -> Option<ChartOutput> {
        let config = &ctx.config.defects;
        let dimension_config = dimension.config(config);
        let path = dimension_config.chart.as_ref()?;

        let spec = report.chart_spec(dimension, config, ctx.today);
        if spec.table.is_empty() {
            warn!("Cannot draw defects by {} chart with zero items", dimension);
            return None;
        }

        Some(ChartOutput {
            spec,
            style: ChartStyle::from_config(
                &ctx.config.style,
                dimension_config.chart_palette.as_deref(),
            ),
            path: ctx.config.output_path(path),
        })
    }
}

impl Calculator for DefectsCalculator {
    fn name(&self) -> &'static str {
        "defects"
    }

    fn charts(&self, ctx: &CalculationContext) -> AppResult<Vec<ChartOutput>> {
        let Some(report) = Self::calculate(ctx)? else {
            return Ok(Vec::new());
        };
        if report.is_empty() {
            warn!("Cannot draw defect charts with zero items");
            return Ok(Vec::new());
        }

        Ok(DefectDimension::ALL
            .iter()
            .filter_map(|dimension| Self::chart(&report, *dimension, ctx))
            .collect())
    }
}
