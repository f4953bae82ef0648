//! Calendar resampling of dated tables and events
//!
//! Periods come from [`Frequency`], labelled by their first day and contiguous
//! from the first to the last observation. Cumulative tables follow the
//! frequency's resampling closure (anchored weeks are right-closed); event
//! counts are always left-closed.

use crate::types::{AggregateTable, Closed, Frequency};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Resample every column to `frequency`, keeping the largest value seen in
/// each period.
///
/// Periods without any observation repeat the previous period's values, which
/// suits cumulative series. With weekly frequencies an observation on the
/// anchor day closes the preceding week.
pub fn resample_max(table: &AggregateTable, frequency: Frequency) -> AggregateTable {
    let (Some(&first), Some(&last)) = (table.index().iter().min(), table.index().iter().max())
    else {
        return AggregateTable::zeros(Vec::new(), table.columns().to_vec());
    };

    let closed = frequency.resample_closed();
    let periods = frequency.periods(first, last, closed);
    let position: HashMap<NaiveDate, usize> =
        periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();

    let mut maxima: Vec<Option<Vec<f64>>> = vec![None; periods.len()];
    for (date, cells) in table.index().iter().zip(table.rows()) {
        let slot = &mut maxima[position[&frequency.bin_start(*date, closed)]];
        if let Some(current) = slot.as_mut() {
            for (best, value) in current.iter_mut().zip(cells) {
                *best = best.max(*value);
            }
        } else {
            *slot = Some(cells.clone());
        }
    }

    let mut previous = vec![0.0; table.column_count()];
    let rows: Vec<Vec<f64>> = maxima
        .into_iter()
        .map(|slot| {
            if let Some(cells) = slot {
                previous = cells;
            }
            previous.clone()
        })
        .collect();

    let mut resampled = AggregateTable::zeros(periods, table.columns().to_vec());
    for (row, cells) in rows.iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            resampled.add(row, col, *value);
        }
    }
    resampled
}

/// Count dated events per period and column.
///
/// Every column in `columns` appears in the result, in that order, even when
/// no event falls into it. Events whose category is not one of `columns` still
/// extend the period range but are not counted.
pub fn count_by_period<'a, I>(events: I, columns: &[String], frequency: Frequency) -> AggregateTable
where
    I: IntoIterator<Item = (NaiveDate, Option<&'a str>)>,
{
    let events: Vec<(NaiveDate, Option<&str>)> = events.into_iter().collect();
    let (Some(first), Some(last)) = (
        events.iter().map(|(date, _)| *date).min(),
        events.iter().map(|(date, _)| *date).max(),
    ) else {
        return AggregateTable::zeros(Vec::new(), columns.to_vec());
    };

    let periods = frequency.periods(first, last, Closed::Left);
    let position: HashMap<NaiveDate, usize> =
        periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();

    let mut table = AggregateTable::zeros(periods, columns.to_vec());
    for (date, category) in events {
        let Some(col) = category.and_then(|c| table.column_position(c)) else {
            continue;
        };
        let row = position[&frequency.period_start(date)];
        table.add(row, col, 1.0);
    }
    table
}

/// Period-over-period difference, with the first value kept as is.
pub fn diff_fill_first(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| if i == 0 { *value } else { value - values[i - 1] })
        .collect()
}
