//! Defects calculator over an in-memory issue source

use crate::common::{abc_issues, date, DEFECTS_QUERY};
use delivery_metrics::analysis::{Calculator, DefectDimension, DefectsCalculator, MetricsEngine};
use delivery_metrics::config::{AppConfig, DimensionConfig};
use delivery_metrics::source::StaticIssueSource;
use delivery_metrics::types::UNKNOWN_CATEGORY;

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.reference_date = Some(date(2018, 3, 31));
    config.defects.query = Some(DEFECTS_QUERY.to_string());
    config.defects.priority = DimensionConfig {
        field: Some("Priority".to_string()),
        values: vec!["high".to_string(), "med".to_string()],
        chart: Some("priority.json".into()),
        ..Default::default()
    };
    config
}

fn engine(config: AppConfig) -> MetricsEngine {
    MetricsEngine::new(config, Box::new(StaticIssueSource::new(abc_issues())))
}

#[test]
fn test_priority_breakdown_from_issues() {
    let engine = engine(config());
    let report = engine.defects().unwrap().unwrap();
    assert_eq!(report.records.len(), 6);

    let table = report.breakdown(DefectDimension::Priority, &engine.config().defects, engine.today());
    assert_eq!(table.column("high"), Some(vec![1.0, 3.0, 2.0]));
    assert_eq!(table.column("med"), Some(vec![2.0, 1.0, 2.0]));
}

#[test]
fn test_unset_field_reads_as_unknown() {
    let engine = engine(config());
    let report = engine.defects().unwrap().unwrap();
    let table = report.breakdown(DefectDimension::Type, &engine.config().defects, engine.today());
    assert_eq!(table.columns(), &[UNKNOWN_CATEGORY.to_string()]);
    assert_eq!(table.column(UNKNOWN_CATEGORY), Some(vec![3.0, 4.0, 4.0]));
}

#[test]
fn test_no_query_skips() {
    let mut config = config();
    config.defects.query = None;
    let engine = engine(config);
    assert!(engine.defects().unwrap().is_none());
    assert!(DefectsCalculator.charts(&engine.context()).unwrap().is_empty());
}

#[test]
fn test_only_configured_charts_are_produced() {
    let engine = engine(config());
    let charts = DefectsCalculator.charts(&engine.context()).unwrap();
    assert_eq!(charts.len(), 1);

    let chart = &charts[0];
    assert_eq!(chart.spec.name, "defects by priority");
    assert_eq!(chart.spec.labels, vec!["Jan 18", "Feb 18", "Mar 18"]);
    assert_eq!(chart.spec.y_title, "Number of items");
    assert!(chart.path.ends_with("priority.json"));
}

#[test]
fn test_zero_issues_produce_no_charts() {
    let engine = MetricsEngine::new(config(), Box::new(StaticIssueSource::default()));
    let report = engine.defects().unwrap().unwrap();
    assert!(report.is_empty());
    assert!(DefectsCalculator.charts(&engine.context()).unwrap().is_empty());
}
