//! Common Test Utilities
//!
//! Fixture builders shared by the unit and integration suites: the six-issue
//! reference set, a five-stage workflow and helpers that lay out a complete
//! metrics project (issue export, cumulative flow CSV, config) in a temp dir.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, NaiveDate};
use delivery_metrics::types::{Issue, Item, StageType, StatusChange, WorkflowStage};
use delivery_metrics::utils::time::parse_timestamp;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ts(value: &str) -> DateTime<FixedOffset> {
    parse_timestamp(value).unwrap()
}

/// The reference set: (key, priority, created, resolved)
pub const ABC_ISSUES: [(&str, &str, (u32, u32), (u32, u32)); 6] = [
    ("ABC-1", "high", (1, 1), (3, 20)),
    ("ABC-2", "med", (1, 2), (1, 20)),
    ("ABC-3", "high", (2, 3), (3, 20)),
    ("ABC-4", "med", (1, 4), (3, 20)),
    ("ABC-5", "high", (2, 5), (2, 20)),
    ("ABC-6", "med", (3, 6), (3, 20)),
];

/// Reference set as bucketing items, all in 2018
pub fn abc_items() -> Vec<Item> {
    ABC_ISSUES
        .iter()
        .map(|(key, priority, (sm, sd), (em, ed))| {
            Item::new(
                *key,
                Some(priority.to_string()),
                date(2018, *sm, *sd),
                Some(date(2018, *em, *ed)),
            )
            .unwrap()
        })
        .collect()
}

/// Reference set as tracker issues with a `Priority` field
pub fn abc_issues() -> Vec<Issue> {
    ABC_ISSUES
        .iter()
        .map(|(key, priority, (sm, sd), (em, ed))| Issue {
            key: key.to_string(),
            created: ts(&format!("2018-{:02}-{:02}T09:00:00.000+0000", sm, sd)),
            resolution_date: Some(ts(&format!("2018-{:02}-{:02}T17:00:00.000+0000", em, ed))),
            resolution: Some("Fixed".to_string()),
            fields: HashMap::from([("Priority".to_string(), priority.to_string())]),
            status_changes: Vec::new(),
        })
        .collect()
}

/// Resolved issue that walked through `statuses` one day at a time
pub fn withdrawn_issue(key: &str, statuses: &[&str], resolved: &str) -> Issue {
    let status_changes = statuses
        .windows(2)
        .enumerate()
        .map(|(i, pair)| StatusChange {
            from: Some(pair[0].to_string()),
            to: Some(pair[1].to_string()),
            at: ts(&format!("2018-01-{:02}T10:00:00.000+0000", i + 1)),
        })
        .collect();
    Issue {
        key: key.to_string(),
        created: ts("2018-01-01T09:00:00.000+0000"),
        resolution_date: Some(ts(resolved)),
        resolution: Some("Withdrawn".to_string()),
        fields: HashMap::new(),
        status_changes,
    }
}

pub fn workflow() -> Vec<WorkflowStage> {
    let stage = |name: &str, stage_type, statuses: &[&str]| WorkflowStage {
        name: name.to_string(),
        stage_type,
        statuses: statuses.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        stage("Backlog", StageType::Backlog, &["Backlog"]),
        stage("Committed", StageType::Accepted, &["Next"]),
        stage("Build", StageType::Accepted, &["In Progress"]),
        stage("Test", StageType::Accepted, &["QA"]),
        stage("Done", StageType::Complete, &["Closed"]),
    ]
}

pub const DEFECTS_QUERY: &str = "issuetype = Bug";
pub const WASTE_QUERY: &str = "resolution = Withdrawn";

/// Cumulative flow data spanning three Monday-based weeks
pub const CFD_CSV: &str = "\
Date,Backlog,Committed,Build,Test,Done
2018-01-01,5,1,0,0,0
2018-01-03,8,3,1,0,0
2018-01-10,9,4,3,1,1
2018-01-16,10,6,4,3,2
";

/// A complete metrics project on disk
pub struct TestProject {
    pub dir: tempfile::TempDir,
}

impl TestProject {
    /// Issue export, cumulative flow CSV and a config enabling every chart
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project = TestProject { dir };
        project.write_issue_dump();
        std::fs::write(project.path("cfd.csv"), CFD_CSV).unwrap();
        project
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn charts_dir(&self) -> PathBuf {
        self.path("charts")
    }

    fn write_issue_dump(&self) {
        let mut defects = serde_json::to_value(abc_issues()).unwrap();
        // Give the defects a type and environment
        for (i, issue) in defects.as_array_mut().unwrap().iter_mut().enumerate() {
            let fields = issue["fields"].as_object_mut().unwrap();
            let bug_type = if i % 3 == 0 { "Config" } else { "Code" };
            fields.insert("Bug type".to_string(), json!(bug_type));
            fields.insert("Environment".to_string(), json!("PROD"));
        }
        let waste = vec![
            withdrawn_issue("W-1", &["Backlog", "Next", "In Progress", "Withdrawn"], "2018-02-10"),
            withdrawn_issue("W-2", &["Backlog", "QA", "Closed", "Withdrawn"], "2018-02-11"),
            withdrawn_issue("W-3", &["Backlog", "Parked", "Withdrawn"], "2018-03-01"),
        ];
        let dump = json!({
            "queries": {
                DEFECTS_QUERY: defects,
                WASTE_QUERY: waste,
            }
        });
        std::fs::write(
            self.path("issues.json"),
            serde_json::to_string_pretty(&dump).unwrap(),
        )
        .unwrap();
    }

    /// Config text with every metric enabled; `committed` names the
    /// committed stage
    pub fn config_toml(&self, committed: &str) -> String {
        format!(
            r#"
reference_date = "2018-03-31"
committed_column = "{committed}"
done_column = "Done"
backlog_column = "Backlog"

[source]
issues = '{issues}'
cfd = '{cfd}'

[output]
directory = '{charts}'

[[workflow]]
name = "Backlog"
type = "backlog"
statuses = ["Backlog"]

[[workflow]]
name = "Committed"
type = "accepted"
statuses = ["Next"]

[[workflow]]
name = "Build"
type = "accepted"
statuses = ["In Progress"]

[[workflow]]
name = "Test"
type = "accepted"
statuses = ["QA"]

[[workflow]]
name = "Done"
type = "complete"
statuses = ["Closed"]

[defects]
query = "{defects_query}"

[defects.priority]
field = "Priority"
values = ["high", "med"]
chart = "defects-by-priority.json"
chart_title = "Defects by priority"

[defects.type]
field = "Bug type"
chart = "defects-by-type.json"

[defects.environment]
field = "Environment"
chart = "defects-by-environment.json"

[net_flow]
frequency = "W-MON"
chart = "net-flow.json"
chart_palette = "RdYlGn"

[waste]
query = "{waste_query}"
chart = "waste.json"
"#,
            committed = committed,
            issues = self.path("issues.json").display(),
            cfd = self.path("cfd.csv").display(),
            charts = self.charts_dir().display(),
            defects_query = DEFECTS_QUERY,
            waste_query = WASTE_QUERY,
        )
    }

    pub fn write_config(&self, committed: &str) -> PathBuf {
        let path = self.path("metrics.toml");
        std::fs::write(&path, self.config_toml(committed)).unwrap();
        path
    }
}

/// Read a chart file written by the Plotly renderer
pub fn read_chart(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
