//! Data sources feeding the metric calculators
//!
//! The issue tracker itself is out of reach of this crate; calculators talk to
//! it through [`IssueSource`]. [`JsonIssueSource`] replays a recorded export,
//! and [`cfd`] loads the precomputed cumulative flow table.

pub mod cfd;
pub mod issues;

pub use cfd::read_cfd_csv;
pub use issues::{JsonIssueSource, StaticIssueSource};

use crate::errors::AppResult;
use crate::types::Issue;

/// Anything that can answer an issue query
pub trait IssueSource {
    /// Issues matching `query`, in tracker order
    fn find_issues(&self, query: &str) -> AppResult<Vec<Issue>>;
}
