//! Unit tests for the metric building blocks

pub mod defects;
pub mod filters;
pub mod issue_source;
pub mod waste;
