//! Percentage helpers for table filtering
//!
//! Shares are computed in `f64` and guard against zero denominators so callers
//! never have to special-case an empty row.

/// Percentage of `part` relative to `total`, or `None` when `total` is zero.
///
/// # Examples
/// ```
/// use delivery_metrics::utils::math::share_percent;
///
/// assert_eq!(share_percent(50.0, 100.0), Some(50.0));
/// assert_eq!(share_percent(1.0, 4.0), Some(25.0));
/// assert_eq!(share_percent(5.0, 0.0), None);
/// ```
#[inline]
pub fn share_percent(part: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        None
    } else {
        Some(part * 100.0 / total)
    }
}

/// Sum of a row of cells.
#[inline]
pub fn row_total(row: &[f64]) -> f64 {
    row.iter().sum()
}
