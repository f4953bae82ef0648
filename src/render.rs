//! Chart hand-off
//!
//! Calculators describe a finished chart as a [`ChartSpec`] and pass it,
//! together with an explicit [`ChartStyle`], to a [`ChartRenderer`]. The
//! bundled [`PlotlyRenderer`] writes Plotly JSON; drawing images is left to
//! whatever consumes that file.

use crate::config::StyleConfig;
use crate::errors::AppResult;
use crate::types::visualisation::{Palette, PlotlyChart, PlotlyLayout, PlotlyTrace};
use crate::types::AggregateTable;
use std::path::Path;
use tracing::{info, warn};

/// How a chart's table is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One bar trace per column, stacked
    StackedBar {
        /// List the legend top-of-stack first
        reverse_legend: bool,
        /// Request one extra colour when the column count is odd so a
        /// diverging palette skips its neutral midpoint
        pad_odd_palette: bool,
    },
    /// A single column drawn as bars, coloured by sign
    SignedBar,
}

/// A finished chart: the final table plus labelling
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub name: String,
    pub title: Option<String>,
    pub kind: ChartKind,
    pub table: AggregateTable,
    /// One label per table row
    pub labels: Vec<String>,
    pub x_title: String,
    pub y_title: String,
}

/// Visual style handed to every render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    pub palette: String,
}

impl ChartStyle {
    pub fn new(palette: impl Into<String>) -> Self {
        Self {
            palette: palette.into(),
        }
    }

    /// Style from configuration, with an optional per-chart palette override
    pub fn from_config(style: &StyleConfig, palette_override: Option<&str>) -> Self {
        Self::new(palette_override.unwrap_or(style.palette.as_str()))
    }

    /// Resolve the palette, falling back to the default for unknown names
    pub fn resolve_palette(&self) -> Palette {
        Palette::named(&self.palette).unwrap_or_else(|| {
            warn!("Unknown palette '{}', using default", self.palette);
            Palette::fallback()
        })
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Sink for finished charts
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec, style: &ChartStyle, output: &Path) -> AppResult<()>;
}

/// Writes charts as Plotly JSON (`{data, layout}`)
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyRenderer;

impl PlotlyRenderer {
    /// Build the Plotly description of a chart
    pub fn to_plotly_chart(chart: &ChartSpec, style: &ChartStyle) -> PlotlyChart {
        let palette = style.resolve_palette();
        let table = &chart.table;
        let layout = PlotlyLayout::basic(chart.title.as_deref(), &chart.x_title, &chart.y_title)
            .with_category_x_axis(-90);

        match chart.kind {
            ChartKind::StackedBar {
                reverse_legend,
                pad_odd_palette,
            } => {
                let mut n_colours = table.column_count();
                if pad_odd_palette && n_colours % 2 == 1 {
                    n_colours += 1;
                }
                let colours = palette.colours(n_colours);

                let data = table
                    .columns()
                    .iter()
                    .zip(colours)
                    .map(|(column, colour)| {
                        let y = table.column(column).unwrap_or_default();
                        PlotlyTrace::bar(chart.labels.clone(), y, column, &colour)
                    })
                    .collect();

                let layout = layout
                    .stacked()
                    .with_legend("v", 1.02, 0.5, "left")
                    .with_legend_order(reverse_legend);
                PlotlyChart { data, layout }
            }
            ChartKind::SignedBar => {
                let colours = palette.colours(2);
                let data = table
                    .columns()
                    .iter()
                    .map(|column| {
                        let y = table.column(column).unwrap_or_default();
                        let bar_colours = y
                            .iter()
                            .map(|value| {
                                if *value >= 0.0 {
                                    colours[0].clone()
                                } else {
                                    colours[1].clone()
                                }
                            })
                            .collect();
                        PlotlyTrace::coloured_bars(chart.labels.clone(), y, column, bar_colours)
                    })
                    .collect();
                PlotlyChart {
                    data,
                    layout: layout.without_legend(),
                }
            }
        }
    }
}

impl ChartRenderer for PlotlyRenderer {
    fn render(&self, chart: &ChartSpec, style: &ChartStyle, output: &Path) -> AppResult<()> {
        let plotly = Self::to_plotly_chart(chart, style);
        let json = serde_json::to_string_pretty(&plotly)?;
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, json)?;
        info!("Writing {} chart to {}", chart.name, output.display());
        Ok(())
    }
}
