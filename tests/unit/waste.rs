//! Waste calculator over an in-memory issue source

use crate::common::{withdrawn_issue, workflow, WASTE_QUERY};
use delivery_metrics::analysis::MetricsEngine;
use delivery_metrics::config::AppConfig;
use delivery_metrics::errors::AppError;
use delivery_metrics::source::StaticIssueSource;
use delivery_metrics::types::Frequency;

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.workflow = workflow();
    config.backlog_column = Some("Backlog".to_string());
    config.done_column = Some("Done".to_string());
    config.waste.query = Some(WASTE_QUERY.to_string());
    config
}

fn engine(config: AppConfig) -> MetricsEngine {
    let issues = vec![
        withdrawn_issue("W-1", &["Backlog", "Next", "In Progress", "Withdrawn"], "2018-02-10"),
        withdrawn_issue("W-2", &["Backlog", "QA", "Closed", "Withdrawn"], "2018-02-11"),
        withdrawn_issue("W-3", &["Backlog", "Parked", "Withdrawn"], "2018-03-01"),
        withdrawn_issue("W-4", &["Backlog", "Withdrawn"], "2018-03-02"),
    ];
    MetricsEngine::new(config, Box::new(StaticIssueSource::new(issues)))
}

#[test]
fn test_withdrawals_exclude_backlog_and_done() {
    let report = engine(config()).waste().unwrap().unwrap();
    let keys: Vec<&str> = report.withdrawn.iter().map(|w| w.key.as_str()).collect();
    assert_eq!(keys, vec!["W-1", "W-3"]);
    assert_eq!(report.unclassified(), 1);
}

#[test]
fn test_breakdown_columns_follow_workflow() {
    let report = engine(config()).waste().unwrap().unwrap();
    let table = &report.breakdown;
    assert_eq!(
        table.columns(),
        &["Committed".to_string(), "Build".to_string(), "Test".to_string()]
    );
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column("Build"), Some(vec![1.0, 0.0]));
    // The unmapped withdrawal has no column
    assert_eq!(table.row_totals(), vec![1.0, 0.0]);
}

#[test]
fn test_weekly_frequency() {
    let mut config = config();
    config.waste.frequency = "W-MON".parse::<Frequency>().unwrap();
    let report = engine(config).waste().unwrap().unwrap();
    // 2018-02-05 .. 2018-02-26 Mondays
    assert_eq!(report.breakdown.row_count(), 4);
    let chart = report.chart_spec(&Default::default());
    assert_eq!(chart.labels[0], "05/02/2018");
    assert_eq!(chart.x_title, "Period starting");
}

#[test]
fn test_unknown_done_column_is_config_error() {
    let mut config = config();
    config.done_column = Some("Finished".to_string());
    assert!(matches!(engine(config).waste(), Err(AppError::Config(_))));
}

#[test]
fn test_no_query_skips() {
    let mut config = config();
    config.waste.query = Some("  ".to_string());
    assert!(engine(config).waste().unwrap().is_none());
}
