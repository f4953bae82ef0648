//! Filter chain behaviour on bucketed reference data

use crate::common::{abc_items, date};
use delivery_metrics::analysis::bucketing::count_by_month;
use delivery_metrics::analysis::filters::{
    collapse_below_threshold, last_n_rows, select_columns, sort_columns_by_last_row,
};
use delivery_metrics::types::{AggregateTable, OTHERS_COLUMN};

fn reference() -> AggregateTable {
    count_by_month(&abc_items(), date(2018, 6, 1))
}

#[test]
fn test_collapse_preserves_rows_and_sums() {
    let table = reference();
    for threshold in [10.0, 30.0, 50.0, 80.0, 100.0] {
        let collapsed = collapse_below_threshold(&table, Some(threshold));
        assert_eq!(collapsed.row_count(), table.row_count());
        assert_eq!(collapsed.row_totals(), table.row_totals());
        assert_eq!(
            collapsed.columns().last().map(String::as_str),
            Some(OTHERS_COLUMN)
        );
    }
}

#[test]
fn test_collapse_on_reference_data() {
    // Row 1 total is 4: med is 2/4, 1/4, 2/4 of it and high 1/4, 3/4, 2/4
    let collapsed = collapse_below_threshold(&reference(), Some(55.0));
    assert_eq!(
        collapsed.columns(),
        &["high".to_string(), OTHERS_COLUMN.to_string()]
    );
    assert_eq!(collapsed.column(OTHERS_COLUMN), Some(vec![2.0, 1.0, 2.0]));
}

#[test]
fn test_window_then_sort() {
    let windowed = last_n_rows(&reference(), Some(2));
    assert_eq!(windowed.index(), &[date(2018, 2, 1), date(2018, 3, 1)]);

    let sorted = sort_columns_by_last_row(&windowed, true);
    // Last row is high=2, med=2: the tie keeps the existing order
    assert_eq!(sorted.columns(), &["high".to_string(), "med".to_string()]);
}

#[test]
fn test_window_larger_than_table_is_identity() {
    let table = reference();
    assert_eq!(last_n_rows(&table, Some(12)), table);
}

#[test]
fn test_select_unknown_values_gives_no_columns() {
    let selected = select_columns(&reference(), &["critical".to_string()]);
    assert_eq!(selected.column_count(), 0);
    assert!(selected.is_empty());
}
