//! Full metrics run: issue export + cumulative flow CSV in, Plotly JSON out

use crate::common::{read_chart, TestProject};
use delivery_metrics::analysis::{MetricsEngine, OutputFormat, ReportFormatter};
use delivery_metrics::config::AppConfig;
use delivery_metrics::errors::{AppError, AppResult};
use delivery_metrics::render::{ChartRenderer, ChartSpec, ChartStyle, PlotlyRenderer};
use std::path::Path;

fn engine(project: &TestProject, committed: &str) -> MetricsEngine {
    let config = AppConfig::from_toml_str(&project.config_toml(committed)).unwrap();
    MetricsEngine::from_config(config).unwrap()
}

#[test]
fn test_run_all_writes_every_chart() {
    let project = TestProject::new();
    let summary = engine(&project, "Committed").run_all(&PlotlyRenderer);

    assert!(summary.is_clean(), "unexpected failures: {:?}", summary);
    assert_eq!(summary.charts_written.len(), 5);
    for name in [
        "defects-by-priority.json",
        "defects-by-type.json",
        "defects-by-environment.json",
        "net-flow.json",
        "waste.json",
    ] {
        assert!(project.charts_dir().join(name).exists(), "{} missing", name);
    }
}

#[test]
fn test_defects_by_priority_chart() {
    let project = TestProject::new();
    engine(&project, "Committed").run_all(&PlotlyRenderer);

    let chart = read_chart(&project.charts_dir().join("defects-by-priority.json"));
    let data = chart["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], "high");
    assert_eq!(data[0]["y"], serde_json::json!([1.0, 3.0, 2.0]));
    assert_eq!(data[1]["y"], serde_json::json!([2.0, 1.0, 2.0]));
    assert_eq!(data[0]["x"], serde_json::json!(["Jan 18", "Feb 18", "Mar 18"]));
    assert_eq!(chart["layout"]["title"]["text"], "Defects by priority");
    assert_eq!(chart["layout"]["barmode"], "stack");
    assert_eq!(chart["layout"]["legend"]["traceorder"], "reversed");
}

#[test]
fn test_net_flow_chart() {
    let project = TestProject::new();
    engine(&project, "Committed").run_all(&PlotlyRenderer);

    let chart = read_chart(&project.charts_dir().join("net-flow.json"));
    let trace = &chart["data"][0];
    assert_eq!(trace["name"], "net_flow");
    // Committed 1, 3, 4, 6 and done 0, 0, 1, 2 per week; the Monday
    // 2018-01-01 reading closes the week of 2017-12-25
    assert_eq!(trace["y"], serde_json::json!([1.0, 2.0, 0.0, 1.0]));
    assert_eq!(
        trace["x"],
        serde_json::json!(["25/12/2017", "01/01/2018", "08/01/2018", "15/01/2018"])
    );
    assert_eq!(chart["layout"]["showlegend"], false);
}

#[test]
fn test_waste_chart() {
    let project = TestProject::new();
    engine(&project, "Committed").run_all(&PlotlyRenderer);

    let chart = read_chart(&project.charts_dir().join("waste.json"));
    let names: Vec<&str> = chart["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|trace| trace["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Committed", "Build", "Test"]);
    assert_eq!(chart["data"][1]["y"], serde_json::json!([1.0, 0.0]));
    assert_eq!(chart["data"][1]["x"], serde_json::json!(["Feb 18", "Mar 18"]));
    // Stages listed in workflow order, not stack order
    assert_eq!(chart["layout"]["legend"]["traceorder"], "normal");
}

#[test]
fn test_bad_stage_binding_only_stops_its_own_metric() {
    let project = TestProject::new();
    let summary = engine(&project, "Doing").run_all(&PlotlyRenderer);

    assert_eq!(summary.failed_calculators, vec!["net flow".to_string()]);
    assert_eq!(summary.charts_written.len(), 4);
    assert!(!project.charts_dir().join("net-flow.json").exists());
    assert!(project.charts_dir().join("waste.json").exists());
}

/// Renderer that refuses one chart and delegates the rest
struct RefusingRenderer {
    refuse: &'static str,
}

impl ChartRenderer for RefusingRenderer {
    fn render(&self, chart: &ChartSpec, style: &ChartStyle, output: &Path) -> AppResult<()> {
        if chart.name == self.refuse {
            return Err(AppError::InvalidData("renderer unavailable".to_string()));
        }
        PlotlyRenderer.render(chart, style, output)
    }
}

#[test]
fn test_render_failure_is_isolated() {
    let project = TestProject::new();
    let summary = engine(&project, "Committed").run_all(&RefusingRenderer {
        refuse: "defects by type",
    });

    assert_eq!(summary.failed_charts, vec!["defects by type".to_string()]);
    assert!(summary.failed_calculators.is_empty());
    assert_eq!(summary.charts_written.len(), 4);
}

#[test]
fn test_analyse_reports() {
    let project = TestProject::new();
    let engine = engine(&project, "Committed");

    let defects = engine.defects().unwrap().unwrap();
    let console =
        ReportFormatter::format_defects(&defects, engine.config(), engine.today(), OutputFormat::Console)
            .unwrap();
    assert!(console.starts_with("Defects: 6"));
    assert!(console.contains("=== DEFECTS BY ENVIRONMENT ==="));

    let waste = engine.waste().unwrap().unwrap();
    let json = ReportFormatter::format_waste(&waste, engine.config(), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["withdrawn_count"], 2);
    assert_eq!(value["unclassified_count"], 1);

    let net_flow = engine.net_flow().unwrap().unwrap();
    let plotly =
        ReportFormatter::format_net_flow(&net_flow, engine.config(), OutputFormat::Plotly).unwrap();
    let value: serde_json::Value = serde_json::from_str(&plotly).unwrap();
    assert_eq!(value["data"][0]["y"], serde_json::json!([1.0, 2.0, 0.0, 1.0]));
}
