//! Interval-to-month bucketing
//!
//! Turns items that are active between a start and an (optional) end date into
//! a month-indexed table broken down by category.
//!
//! ## Key Design Decisions
//!
//! - **Active months**: an item counts in every month it spans, not only the
//!   months it starts and ends in
//! - **Open items**: a missing end date is read as `today`, which callers pass
//!   in explicitly so results are reproducible
//! - **Dense grid**: the month index is contiguous from the earliest start
//!   month to the latest effective end month, missing cells are `0.0`
//! - **Column order**: categories sorted lexicographically, the null category
//!   first under the `"unknown"` label

use crate::types::{AggregateTable, Item, UNKNOWN_CATEGORY};
use crate::utils::time::{end_of_month, floor_to_month, month_starts, overlap_days};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Count the items active in each month, per category.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use delivery_metrics::analysis::bucketing::count_by_month;
/// use delivery_metrics::types::Item;
///
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
/// let items = vec![
///     Item::new("A", Some("high".into()), d(2018, 1, 1), Some(d(2018, 3, 20))).unwrap(),
///     Item::new("B", Some("med".into()), d(2018, 1, 2), Some(d(2018, 1, 20))).unwrap(),
/// ];
/// let table = count_by_month(&items, d(2018, 6, 1));
/// assert_eq!(table.row_count(), 3);
/// assert_eq!(table.value(1, "med"), Some(0.0));
/// ```
pub fn count_by_month(items: &[Item], today: NaiveDate) -> AggregateTable {
    bucket_by_month(items, today, |_, _, _| 1.0)
}

/// Sum, per category, the number of days each item overlaps each month.
///
/// Day counts are inclusive: an item starting and ending on the same day
/// contributes one day.
pub fn sum_overlap_days_by_month(items: &[Item], today: NaiveDate) -> AggregateTable {
    bucket_by_month(items, today, |item, month, effective_end| {
        overlap_days(item.start, effective_end, month, end_of_month(month)) as f64
    })
}

fn month_ordinal(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

fn bucket_by_month<F>(items: &[Item], today: NaiveDate, contribution: F) -> AggregateTable
where
    F: Fn(&Item, NaiveDate, NaiveDate) -> f64,
{
    let (Some(first), Some(last)) = (
        items.iter().map(|item| floor_to_month(item.start)).min(),
        items
            .iter()
            .map(|item| floor_to_month(item.effective_end(today)))
            .max(),
    ) else {
        return AggregateTable::empty();
    };

    // BTreeMap orders None before any label
    let mut categories: BTreeMap<Option<&str>, usize> = BTreeMap::new();
    for item in items {
        categories.insert(item.category.as_deref(), 0);
    }
    for (position, slot) in categories.values_mut().enumerate() {
        *slot = position;
    }
    let columns: Vec<String> = categories
        .keys()
        .map(|category| category.unwrap_or(UNKNOWN_CATEGORY).to_string())
        .collect();

    let index = month_starts(first, last);
    let origin = month_ordinal(first);
    let mut table = AggregateTable::zeros(index, columns);

    for item in items {
        let effective_end = item.effective_end(today);
        let col = categories[&item.category.as_deref()];
        for month in month_starts(item.start, effective_end) {
            let row = (month_ordinal(month) - origin) as usize;
            table.add(row, col, contribution(item, month, effective_end));
        }
    }

    table
}
