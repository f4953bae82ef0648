//! Recorded issue exports

use crate::common::date;
use delivery_metrics::errors::AppError;
use delivery_metrics::source::{IssueSource, JsonIssueSource};

const DUMP: &str = r#"{
    "queries": {
        "project = ABC": [
            {
                "key": "ABC-1",
                "created": "2018-01-01T10:00:00.000+0000",
                "resolution_date": "2018-03-20T16:30:00.000+0000",
                "resolution": "Done",
                "fields": {"Priority": "High"},
                "status_changes": [
                    {"from": "Backlog", "to": "In Progress", "at": "2018-01-02T09:00:00.000+0000"},
                    {"from": "In Progress", "to": "Closed", "at": "2018-03-20T16:30:00.000+0000"}
                ]
            },
            {
                "key": "ABC-2",
                "created": "2018-02-01",
                "resolution_date": null
            }
        ]
    }
}"#;

#[test]
fn test_tracker_timestamps_and_defaults() {
    let source = JsonIssueSource::from_json_str(DUMP).unwrap();
    let issues = source.find_issues("project = ABC").unwrap();
    assert_eq!(issues.len(), 2);

    let first = &issues[0];
    assert_eq!(first.created_date(), date(2018, 1, 1));
    assert_eq!(first.resolved_date(), Some(date(2018, 3, 20)));
    assert_eq!(first.field_value("Priority"), Some("High"));
    assert_eq!(first.last_status_before_resolution(), Some("In Progress"));

    let second = &issues[1];
    assert_eq!(second.resolved_date(), None);
    assert!(second.fields.is_empty());
    assert!(second.status_changes.is_empty());
}

#[test]
fn test_unknown_query_is_empty() {
    let source = JsonIssueSource::from_json_str(DUMP).unwrap();
    assert!(source.find_issues("project = XYZ").unwrap().is_empty());
}

#[test]
fn test_missing_file() {
    let result = JsonIssueSource::from_path(std::path::Path::new("/no/such/issues.json"));
    assert!(matches!(result, Err(AppError::InvalidData(_))));
}
