//! Date-indexed categorical table
//!
//! [`AggregateTable`] is the hand-off format between bucketing, filtering and
//! rendering: an ordered date index, ordered column labels and a dense
//! row-major grid of `f64` cells. Absent (row, column) pairs do not exist;
//! bucketers fill them with `0.0`.

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column label used for the null category
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Column label for the collapsed below-threshold bucket
pub const OTHERS_COLUMN: &str = "Others";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateTable {
    index: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl AggregateTable {
    /// Build a table, checking that the grid matches the index and columns
    pub fn new(index: Vec<NaiveDate>, columns: Vec<String>, values: Vec<Vec<f64>>) -> AppResult<Self> {
        if values.len() != index.len() {
            return Err(AppError::InvalidData(format!(
                "table has {} index entries but {} rows",
                index.len(),
                values.len()
            )));
        }
        if let Some((row, cells)) = values
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(AppError::InvalidData(format!(
                "row {} has {} cells, expected {}",
                row,
                cells.len(),
                columns.len()
            )));
        }
        Ok(Self {
            index,
            columns,
            values,
        })
    }

    /// Zero-filled table over the given index and columns
    pub fn zeros(index: Vec<NaiveDate>, columns: Vec<String>) -> Self {
        let values = vec![vec![0.0; columns.len()]; index.len()];
        Self {
            index,
            columns,
            values,
        }
    }

    /// Table with no rows and no columns
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when there is nothing to chart: no rows or no columns
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value by row position and column label
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.column_position(column)?;
        self.values.get(row).and_then(|cells| cells.get(col)).copied()
    }

    /// All values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let col = self.column_position(name)?;
        Some(self.values.iter().map(|cells| cells[col]).collect())
    }

    /// Sum of each row across all columns
    pub fn row_totals(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|cells| crate::utils::math::row_total(cells))
            .collect()
    }

    pub(crate) fn add(&mut self, row: usize, col: usize, amount: f64) {
        self.values[row][col] += amount;
    }

    /// New table keeping the columns at `positions`, in that order
    pub(crate) fn project(&self, positions: &[usize]) -> Self {
        let columns = positions.iter().map(|&p| self.columns[p].clone()).collect();
        let values = self
            .values
            .iter()
            .map(|cells| positions.iter().map(|&p| cells[p]).collect())
            .collect();
        Self {
            index: self.index.clone(),
            columns,
            values,
        }
    }

    /// New table keeping rows from `start` to the end
    pub(crate) fn tail_from(&self, start: usize) -> Self {
        let start = start.min(self.index.len());
        Self {
            index: self.index[start..].to_vec(),
            columns: self.columns.clone(),
            values: self.values[start..].to_vec(),
        }
    }

    /// New table with one extra column appended
    pub(crate) fn with_column(&self, name: &str, cells: Vec<f64>) -> Self {
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let values = self
            .values
            .iter()
            .zip(cells)
            .map(|(row, cell)| {
                let mut row = row.clone();
                row.push(cell);
                row
            })
            .collect();
        Self {
            index: self.index.clone(),
            columns,
            values,
        }
    }
}
