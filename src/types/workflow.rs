//! Workflow stage definitions and raw-status lookup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageType {
    Backlog,
    Accepted,
    Complete,
}

/// A named step in the delivery workflow, mapped from raw tracker statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStage {
    pub name: String,
    #[serde(rename = "type")]
    pub stage_type: StageType,
    #[serde(default)]
    pub statuses: Vec<String>,
}

/// Case-insensitive map from raw tracker status to workflow stage name
#[derive(Debug, Clone, Default)]
pub struct StatusLookup {
    by_status: HashMap<String, String>,
}

impl StatusLookup {
    /// Build the lookup from the ordered stage list.
    ///
    /// A status listed under several stages resolves to the last one.
    pub fn from_stages(stages: &[WorkflowStage]) -> Self {
        let mut by_status = HashMap::new();
        for stage in stages {
            for status in &stage.statuses {
                by_status.insert(status.to_lowercase(), stage.name.clone());
            }
        }
        Self { by_status }
    }

    pub fn stage_for(&self, status: &str) -> Option<&str> {
        self.by_status.get(&status.to_lowercase()).map(String::as_str)
    }
}

/// Names of the stages, in workflow order
pub fn stage_names(stages: &[WorkflowStage]) -> Vec<String> {
    stages.iter().map(|s| s.name.clone()).collect()
}
