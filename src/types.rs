//! Delivery metrics type system
//!
//! - `issue`: Issue tracker records and the interval items derived from them
//! - `table`: Date-indexed categorical table shared by every pipeline
//! - `workflow`: Workflow stages and raw-status lookup
//! - `frequency`: Calendar resampling frequencies
//! - `visualisation`: Plotly chart types and colour palettes

pub mod frequency;
pub mod issue;
pub mod table;
pub mod visualisation;
pub mod workflow;

pub use frequency::{Closed, Frequency};
pub use issue::{Issue, Item, StatusChange};
pub use table::{AggregateTable, OTHERS_COLUMN, UNKNOWN_CATEGORY};
pub use workflow::{StageType, StatusLookup, WorkflowStage};
