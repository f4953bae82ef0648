//! Integration Tests Module
//!
//! End-to-end runs of the metrics engine and CLI configuration loading
//! against a complete project laid out in a temp dir.

pub mod config_loading;
pub mod pipeline;
