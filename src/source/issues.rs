use super::IssueSource;
use crate::errors::{AppError, AppResult};
use crate::types::Issue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// On-disk layout of a recorded tracker export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueDump {
    /// Issues returned by each query, keyed by the exact query text
    #[serde(default)]
    pub queries: HashMap<String, Vec<Issue>>,
}

/// Issue source backed by a JSON export file
#[derive(Debug, Clone)]
pub struct JsonIssueSource {
    dump: IssueDump,
}

impl JsonIssueSource {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::InvalidData(format!(
                "Cannot read issue export {}: {}",
                path.display(),
                e
            ))
        })?;
        let source = Self::from_json_str(&text)?;
        debug!(
            "Loaded {} recorded queries from {}",
            source.dump.queries.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn from_json_str(text: &str) -> AppResult<Self> {
        let dump: IssueDump = serde_json::from_str(text)?;
        Ok(Self { dump })
    }
}

impl IssueSource for JsonIssueSource {
    fn find_issues(&self, query: &str) -> AppResult<Vec<Issue>> {
        match self.dump.queries.get(query) {
            Some(issues) => Ok(issues.clone()),
            None => {
                warn!("No recorded results for query '{}'", query);
                Ok(Vec::new())
            }
        }
    }
}

/// In-memory source returning the same issues for every query
#[derive(Debug, Clone, Default)]
pub struct StaticIssueSource {
    issues: Vec<Issue>,
}

impl StaticIssueSource {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

impl IssueSource for StaticIssueSource {
    fn find_issues(&self, _query: &str) -> AppResult<Vec<Issue>> {
        Ok(self.issues.clone())
    }
}
