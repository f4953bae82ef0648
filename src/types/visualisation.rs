//! Plotly chart types for data visualisation
//!
//! Shared Plotly types used by the chart renderer to emit charts compatible
//! with Plotly.js, plus the named colour palettes charts are drawn with.

use serde::Serialize;

// ============================================================================
// Chart Types
// ============================================================================

/// Complete Plotly chart data structure
///
/// Standard format expected by Plotly.js: `{data: [...], layout: {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct PlotlyChart {
    pub data: Vec<PlotlyTrace>,
    pub layout: PlotlyLayout,
}

/// Plotly trace configuration
///
/// Represents a single data series in the chart.
#[derive(Debug, Clone, Serialize)]
pub struct PlotlyTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub name: String,
    #[serde(rename = "type")]
    pub trace_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<PlotlyMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

/// Marker colour: one colour for the whole trace, or one per bar
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MarkerColour {
    Single(String),
    PerPoint(Vec<String>),
}

/// Plotly marker configuration
#[derive(Debug, Clone, Serialize)]
pub struct PlotlyMarker {
    pub color: MarkerColour,
}

/// Plotly hover label configuration
#[derive(Debug, Clone, Serialize)]
pub struct PlotlyHoverLabel {
    /// -1 means show full name without truncation
    pub namelength: i32,
}

/// Plotly legend configuration
#[derive(Debug, Clone, Serialize, Default)]
pub struct PlotlyLegend {
    /// Legend orientation: "v" (vertical) or "h" (horizontal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Horizontal anchor: "left", "center", "right", "auto"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    /// "reversed" lists the top of a stack first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceorder: Option<String>,
}

/// Plotly layout configuration
#[derive(Debug, Clone, Serialize)]
pub struct PlotlyLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<PlotlyTitle>,
    pub xaxis: PlotlyAxis,
    pub yaxis: PlotlyAxis,
    pub hovermode: String,
    pub hoverlabel: PlotlyHoverLabel,
    /// Bar mode: "stack", "group", "overlay", "relative"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    /// Legend configuration (position, orientation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<PlotlyLegend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

/// Plotly title configuration
#[derive(Debug, Clone, Serialize)]
pub struct PlotlyTitle {
    pub text: String,
}

/// Plotly axis configuration
#[derive(Debug, Clone, Serialize)]
pub struct PlotlyAxis {
    pub title: String,
    /// Category axes keep the preformatted labels in order
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
}

impl PlotlyAxis {
    fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            axis_type: None,
            tickangle: None,
        }
    }
}

impl PlotlyLayout {
    /// Create a basic layout with single y-axis
    pub fn basic(title: Option<&str>, x_title: &str, y_title: &str) -> Self {
        Self {
            title: title.map(|text| PlotlyTitle {
                text: text.to_string(),
            }),
            xaxis: PlotlyAxis::titled(x_title),
            yaxis: PlotlyAxis::titled(y_title),
            hovermode: "x unified".to_string(),
            hoverlabel: PlotlyHoverLabel { namelength: -1 },
            barmode: None,
            legend: None,
            showlegend: None,
        }
    }

    /// Treat the x-axis as ordered categories rotated by `tickangle`
    pub fn with_category_x_axis(mut self, tickangle: i32) -> Self {
        self.xaxis.axis_type = Some("category".to_string());
        self.xaxis.tickangle = Some(tickangle);
        self
    }

    /// Stack bar traces on top of each other
    pub fn stacked(mut self) -> Self {
        self.barmode = Some("stack".to_string());
        self
    }

    /// Add legend configuration
    ///
    /// Standard positioning: `with_legend("v", 1.02, 0.5, "left")` for vertical legend on right
    pub fn with_legend(mut self, orientation: &str, x: f64, y: f64, xanchor: &str) -> Self {
        self.legend = Some(PlotlyLegend {
            orientation: Some(orientation.to_string()),
            x: Some(x),
            y: Some(y),
            xanchor: Some(xanchor.to_string()),
            traceorder: None,
        });
        self
    }

    /// Legend entry order: `reversed` lists the top of the stack first,
    /// otherwise entries follow trace order
    pub fn with_legend_order(mut self, reversed: bool) -> Self {
        let legend = self.legend.get_or_insert_with(PlotlyLegend::default);
        let order = if reversed { "reversed" } else { "normal" };
        legend.traceorder = Some(order.to_string());
        self
    }

    pub fn without_legend(mut self) -> Self {
        self.showlegend = Some(false);
        self
    }
}

impl PlotlyTrace {
    /// Create a bar trace
    pub fn bar(x: Vec<String>, y: Vec<f64>, name: &str, color: &str) -> Self {
        Self {
            x,
            y,
            name: name.to_string(),
            trace_type: "bar".to_string(),
            marker: Some(PlotlyMarker {
                color: MarkerColour::Single(color.to_string()),
            }),
            hovertemplate: None,
        }
    }

    /// Create a bar trace with one colour per bar
    pub fn coloured_bars(x: Vec<String>, y: Vec<f64>, name: &str, colours: Vec<String>) -> Self {
        Self {
            x,
            y,
            name: name.to_string(),
            trace_type: "bar".to_string(),
            marker: Some(PlotlyMarker {
                color: MarkerColour::PerPoint(colours),
            }),
            hovertemplate: None,
        }
    }
}

// ============================================================================
// Palettes
// ============================================================================

/// How colours are drawn from a palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    /// Distinct colours, cycled when more are needed
    Qualitative,
    /// Ordered ramp, sampled evenly from end to end
    Diverging,
}

/// A named list of colours
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    pub kind: PaletteKind,
    colours: &'static [&'static str],
}

const PALETTES: &[Palette] = &[
    Palette {
        name: "default",
        kind: PaletteKind::Qualitative,
        colours: &[
            "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2",
            "#7F7F7F", "#BCBD22", "#17BECF",
        ],
    },
    Palette {
        name: "flat",
        kind: PaletteKind::Qualitative,
        colours: &[
            "#E74C3C", "#3498DB", "#9B59B6", "#2ECC71", "#F39C12", "#1ABC9C", "#E67E22",
            "#16A085", "#D35400", "#95A5A6",
        ],
    },
    Palette {
        name: "pastel",
        kind: PaletteKind::Qualitative,
        colours: &[
            "#A1C9F4", "#FFB482", "#8DE5A1", "#FF9F9B", "#D0BBFF", "#DEBB9B", "#FAB0E4",
            "#CFCFCF", "#FFFEA3", "#B9F2F0",
        ],
    },
    Palette {
        name: "RdYlGn",
        kind: PaletteKind::Diverging,
        colours: &[
            "#A50026", "#D73027", "#F46D43", "#FDAE61", "#FEE08B", "#FFFFBF", "#D9EF8B",
            "#A6D96A", "#66BD63", "#1A9850", "#006837",
        ],
    },
    Palette {
        name: "RdYlGn_r",
        kind: PaletteKind::Diverging,
        colours: &[
            "#006837", "#1A9850", "#66BD63", "#A6D96A", "#D9EF8B", "#FFFFBF", "#FEE08B",
            "#FDAE61", "#F46D43", "#D73027", "#A50026",
        ],
    },
    Palette {
        name: "coolwarm",
        kind: PaletteKind::Diverging,
        colours: &[
            "#3B4CC0", "#6282EA", "#8DB0FE", "#B8D0F9", "#DDDDDD", "#F5C4AD", "#F49A7B",
            "#DE604D", "#B40426",
        ],
    },
];

impl Palette {
    /// Look up a palette by name (case-insensitive)
    pub fn named(name: &str) -> Option<Palette> {
        PALETTES
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .copied()
    }

    pub fn fallback() -> Palette {
        PALETTES[0]
    }

    /// Draw `n` colours from the palette
    pub fn colours(&self, n: usize) -> Vec<String> {
        match self.kind {
            PaletteKind::Qualitative => self
                .colours
                .iter()
                .cycle()
                .take(n)
                .map(|c| c.to_string())
                .collect(),
            PaletteKind::Diverging => {
                let last = self.colours.len() - 1;
                (0..n)
                    .map(|i| {
                        let pos = if n <= 1 { 0 } else { i * last / (n - 1) };
                        self.colours[pos].to_string()
                    })
                    .collect()
            }
        }
    }
}
