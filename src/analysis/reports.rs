//! Report formatting for the `analyse` command
//!
//! Every metric can be printed as a console table, exported as JSON (the
//! finalized tables), or exported as the Plotly charts the `run` command
//! would write.

use super::defects::{DefectDimension, DefectsReport};
use super::net_flow::NetFlowReport;
use super::waste::WasteReport;
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::render::{ChartSpec, ChartStyle, PlotlyRenderer};
use crate::types::AggregateTable;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Output format options for metric reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Console,
    /// Finalized tables as JSON
    Json,
    /// Plotly `{data, layout}` JSON
    Plotly,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "plotly" => Ok(OutputFormat::Plotly),
            other => Err(AppError::Config(format!(
                "Unknown output format '{}' (expected console, json or plotly)",
                other
            ))),
        }
    }
}

#[derive(Serialize)]
struct DefectsExport<'a> {
    issue_count: usize,
    breakdowns: BTreeMap<String, &'a AggregateTable>,
}

#[derive(Serialize)]
struct WasteExport<'a> {
    withdrawn_count: usize,
    unclassified_count: usize,
    breakdown: &'a AggregateTable,
}

/// Report formatter for metric results
pub struct ReportFormatter;

impl ReportFormatter {
    /// Format a number for console output, dropping `.0` from whole numbers
    ///
    /// ```
    /// # use delivery_metrics::analysis::ReportFormatter;
    /// assert_eq!(ReportFormatter::format_value(3.0), "3");
    /// assert_eq!(ReportFormatter::format_value(-2.5), "-2.50");
    /// ```
    pub fn format_value(value: f64) -> String {
        if value.fract() == 0.0 {
            format!("{}", value as i64)
        } else {
            format!("{:.2}", value)
        }
    }

    /// Render a table with one labelled line per row
    pub fn format_table(table: &AggregateTable, labels: &[String]) -> String {
        let label_width = labels
            .iter()
            .map(|l| l.len())
            .chain(std::iter::once("Period".len()))
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = table
            .columns()
            .iter()
            .map(|c| c.len().max(6))
            .collect();

        let mut output = format!("{:<width$}", "Period", width = label_width);
        for (column, width) in table.columns().iter().zip(&widths) {
            output.push_str(&format!(" | {:>width$}", column, width = *width));
        }
        output.push('\n');
        let rule_len = label_width + widths.iter().map(|w| w + 3).sum::<usize>();
        output.push_str(&format!("{}\n", "-".repeat(rule_len)));

        for (row, cells) in table.rows().iter().enumerate() {
            let label = labels.get(row).map(String::as_str).unwrap_or_default();
            output.push_str(&format!("{:<width$}", label, width = label_width));
            for (value, width) in cells.iter().zip(&widths) {
                output.push_str(&format!(
                    " | {:>width$}",
                    Self::format_value(*value),
                    width = *width
                ));
            }
            output.push('\n');
        }
        output
    }

    /// Format one finished chart
    pub fn format_chart(chart: &ChartSpec, style: &ChartStyle, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Console => {
                let mut output = format!("=== {} ===\n\n", chart.name.to_uppercase());
                if chart.table.is_empty() {
                    output.push_str("No data\n");
                } else {
                    output.push_str(&Self::format_table(&chart.table, &chart.labels));
                }
                Ok(output)
            }
            OutputFormat::Json => Self::export_json(&chart.table),
            OutputFormat::Plotly => Self::export_json(&PlotlyRenderer::to_plotly_chart(chart, style)),
        }
    }

    pub fn format_defects(
        report: &DefectsReport,
        config: &AppConfig,
        today: NaiveDate,
        format: OutputFormat,
    ) -> AppResult<String> {
        let charts: Vec<(DefectDimension, ChartSpec)> = DefectDimension::ALL
            .iter()
            .map(|dimension| (*dimension, report.chart_spec(*dimension, &config.defects, today)))
            .collect();

        match format {
            OutputFormat::Console => {
                let mut output = format!("Defects: {}\n\n", report.records.len());
                for (_, chart) in &charts {
                    output.push_str(&Self::format_chart(chart, &ChartStyle::default(), format)?);
                    output.push('\n');
                }
                Ok(output)
            }
            OutputFormat::Json => Self::export_json(&DefectsExport {
                issue_count: report.records.len(),
                breakdowns: charts
                    .iter()
                    .map(|(dimension, chart)| (dimension.to_string(), &chart.table))
                    .collect(),
            }),
            OutputFormat::Plotly => {
                let plotly: BTreeMap<String, _> = charts
                    .iter()
                    .map(|(dimension, chart)| {
                        let palette = dimension.config(&config.defects).chart_palette.as_deref();
                        let style = ChartStyle::from_config(&config.style, palette);
                        (dimension.to_string(), PlotlyRenderer::to_plotly_chart(chart, &style))
                    })
                    .collect();
                Self::export_json(&plotly)
            }
        }
    }

    pub fn format_net_flow(report: &NetFlowReport, config: &AppConfig, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Console => {
                let labels = NetFlowReport::labels(&report.table);
                let mut output = format!("=== NET FLOW ({}) ===\n\n", report.frequency);
                output.push_str(&Self::format_table(&report.table, &labels));
                Ok(output)
            }
            OutputFormat::Json => Self::export_json(report),
            OutputFormat::Plotly => {
                let style = ChartStyle::from_config(&config.style, config.net_flow.chart_palette.as_deref());
                Self::format_chart(&report.chart_spec(&config.net_flow), &style, format)
            }
        }
    }

    pub fn format_waste(report: &WasteReport, config: &AppConfig, format: OutputFormat) -> AppResult<String> {
        let chart = report.chart_spec(&config.waste);
        match format {
            OutputFormat::Console => {
                let mut output = format!(
                    "Withdrawn: {} ({} from unmapped statuses)\n\n",
                    report.withdrawn.len(),
                    report.unclassified()
                );
                output.push_str(&Self::format_chart(&chart, &ChartStyle::default(), format)?);
                Ok(output)
            }
            OutputFormat::Json => Self::export_json(&WasteExport {
                withdrawn_count: report.withdrawn.len(),
                unclassified_count: report.unclassified(),
                breakdown: &report.breakdown,
            }),
            OutputFormat::Plotly => {
                let style = ChartStyle::from_config(&config.style, config.waste.chart_palette.as_deref());
                Self::format_chart(&chart, &style, format)
            }
        }
    }

    /// Export any serializable result as pretty JSON
    pub fn export_json<T: Serialize>(data: &T) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}
