//! Delivery metrics for agile teams
//!
//! Defect concentration, net flow and waste, calculated from issue tracker
//! exports and written as Plotly chart descriptions.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod errors;
pub mod render;
pub mod source;
pub mod types;
pub mod utils;
