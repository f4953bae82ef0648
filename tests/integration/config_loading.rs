//! Configuration file and environment overrides

use crate::common::TestProject;
use delivery_metrics::analysis::MetricsEngine;
use delivery_metrics::config::AppConfig;
use delivery_metrics::render::PlotlyRenderer;
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn test_load_project_config_file() {
    let project = TestProject::new();
    let path = project.write_config("Committed");

    let config = AppConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.workflow.len(), 5);
    assert_eq!(config.defects.priority.values, vec!["high", "med"]);
    assert_eq!(config.net_flow.chart_palette.as_deref(), Some("RdYlGn"));
}

#[test]
#[serial]
fn test_env_override_changes_window() {
    let project = TestProject::new();
    let path = project.write_config("Committed");

    env::set_var("DELIVERY_METRICS__DEFECTS__WINDOW", "2");
    let config = AppConfig::load(Some(path.as_path()));
    env::remove_var("DELIVERY_METRICS__DEFECTS__WINDOW");

    let engine = MetricsEngine::from_config(config.unwrap()).unwrap();
    engine.run_all(&PlotlyRenderer);
    let chart = crate::common::read_chart(&project.charts_dir().join("defects-by-priority.json"));
    assert_eq!(chart["data"][0]["x"], serde_json::json!(["Feb 18", "Mar 18"]));
}

#[test]
#[serial]
fn test_effective_config_round_trips() {
    let project = TestProject::new();
    let config = AppConfig::load(Some(project.write_config("Committed").as_path())).unwrap();
    let reparsed = AppConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
    assert_eq!(reparsed.workflow, config.workflow);
    assert_eq!(reparsed.reference_date, config.reference_date);
    assert_eq!(reparsed.source.issues, config.source.issues);
}
