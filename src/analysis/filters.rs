//! Table post-processing applied before a breakdown is charted
//!
//! Every filter takes the table by reference and returns a new one; the
//! input is never modified.

use crate::types::{AggregateTable, OTHERS_COLUMN};
use crate::utils::math::share_percent;
use std::cmp::Ordering;

/// Restrict (and order) the columns to `names`.
///
/// Names missing from the table are ignored. An empty `names` keeps the table
/// as it is.
pub fn select_columns(table: &AggregateTable, names: &[String]) -> AggregateTable {
    if names.is_empty() {
        return table.clone();
    }
    let positions: Vec<usize> = names
        .iter()
        .filter_map(|name| table.column_position(name))
        .collect();
    table.project(&positions)
}

/// Fold every column whose share stays below `threshold` percent into an
/// "Others" column.
///
/// Shares are measured against the total of the second row (row index 1) for
/// every row, falling back to the only row of a single-row table. A column is
/// folded only when all of its shares are below the threshold. A zero total
/// folds nothing.
pub fn collapse_below_threshold(table: &AggregateTable, threshold: Option<f64>) -> AggregateTable {
    let threshold = match threshold {
        Some(t) if t > 0.0 => t,
        _ => return table.clone(),
    };
    if table.row_count() == 0 {
        return table.clone();
    }

    let totals = table.row_totals();
    let divisor = totals[1.min(totals.len() - 1)];

    let qualifies = |col: usize| {
        table.columns()[col] != OTHERS_COLUMN
            && table.rows().iter().all(|cells| {
                share_percent(cells[col], divisor).is_some_and(|share| share < threshold)
            })
    };
    let (collapsed, kept): (Vec<usize>, Vec<usize>) =
        (0..table.column_count()).partition(|&col| qualifies(col));

    let existing_others = table.column_position(OTHERS_COLUMN);
    let others: Vec<f64> = table
        .rows()
        .iter()
        .map(|cells| {
            let folded: f64 = collapsed.iter().map(|&col| cells[col]).sum();
            folded + existing_others.map_or(0.0, |col| cells[col])
        })
        .collect();

    let kept: Vec<usize> = kept
        .into_iter()
        .filter(|&col| Some(col) != existing_others)
        .collect();
    table.project(&kept).with_column(OTHERS_COLUMN, others)
}

/// Keep only the trailing `window` rows.
pub fn last_n_rows(table: &AggregateTable, window: Option<usize>) -> AggregateTable {
    match window {
        Some(window) if window > 0 => {
            table.tail_from(table.row_count().saturating_sub(window))
        }
        _ => table.clone(),
    }
}

/// Reorder columns by their value in the last row (descending unless
/// `ascending`). Ties keep their current order.
pub fn sort_columns_by_last_row(table: &AggregateTable, ascending: bool) -> AggregateTable {
    let Some(last) = table.rows().last() else {
        return table.clone();
    };
    if table.column_count() == 0 {
        return table.clone();
    }

    let mut positions: Vec<usize> = (0..table.column_count()).collect();
    positions.sort_by(|&a, &b| {
        let ordering = last[a].partial_cmp(&last[b]).unwrap_or(Ordering::Equal);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    table.project(&positions)
}
