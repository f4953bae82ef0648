//! Shared helpers for calendar arithmetic and percentage maths

pub mod math;
pub mod time;
