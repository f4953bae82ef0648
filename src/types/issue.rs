//! Issue tracker records and the interval items derived from them

use crate::utils::time::serde_timestamp;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single status transition in an issue's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status the issue left; `None` for the creation event
    #[serde(default)]
    pub from: Option<String>,
    /// Status the issue entered
    #[serde(default)]
    pub to: Option<String>,
    #[serde(with = "serde_timestamp")]
    pub at: DateTime<FixedOffset>,
}

/// Issue snapshot as returned by an [`IssueSource`](crate::source::IssueSource)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(with = "serde_timestamp")]
    pub created: DateTime<FixedOffset>,
    #[serde(default, with = "serde_timestamp::option")]
    pub resolution_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub resolution: Option<String>,
    /// Resolved field values keyed by field name (e.g. "Priority")
    #[serde(default)]
    pub fields: HashMap<String, String>,
    #[serde(default)]
    pub status_changes: Vec<StatusChange>,
}

impl Issue {
    /// Resolved value of a named field, if the issue carries one
    pub fn field_value(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Calendar date the issue was created, in its own offset
    pub fn created_date(&self) -> NaiveDate {
        self.created.date_naive()
    }

    /// Calendar date the issue was resolved, if it has been
    pub fn resolved_date(&self) -> Option<NaiveDate> {
        self.resolution_date.map(|dt| dt.date_naive())
    }

    /// Status the issue held immediately before its final transition.
    ///
    /// Status changes are replayed in chronological order (stable for equal
    /// timestamps) and the `from` side of the last change is returned.
    pub fn last_status_before_resolution(&self) -> Option<&str> {
        let mut changes: Vec<&StatusChange> = self.status_changes.iter().collect();
        changes.sort_by_key(|change| change.at);
        changes.last().and_then(|change| change.from.as_deref())
    }
}

/// An interval with a categorical value, the unit of monthly bucketing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    pub category: Option<String>,
    pub start: NaiveDate,
    /// `None` while the item is still open
    pub end: Option<NaiveDate>,
}

impl Item {
    /// Build an item, rejecting intervals that end before they start
    pub fn new(
        key: impl Into<String>,
        category: Option<String>,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Option<Self> {
        if matches!(end, Some(end) if end < start) {
            return None;
        }
        Some(Self {
            key: key.into(),
            category,
            start,
            end,
        })
    }

    /// End date, or `today` if the item is still open
    pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
        self.end.unwrap_or(today)
    }
}
