//! Cumulative flow table loading
//!
//! The CSV has a header row; the first column holds the date, every other
//! column one workflow stage's cumulative item count. Lines starting with `#`
//! are ignored and empty cells read as zero.

use crate::errors::{AppError, AppResult};
use crate::types::AggregateTable;
use crate::utils::time::parse_timestamp;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Read a cumulative flow CSV file
pub fn read_cfd_csv(path: &Path) -> AppResult<AggregateTable> {
    let file = File::open(path).map_err(AppError::Io)?;
    let table = read_cfd(BufReader::new(file))?;
    info!(
        "Loaded cumulative flow data: {} rows x {} stages from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Read cumulative flow data from any reader
pub fn read_cfd<R: Read>(reader: R) -> AppResult<AggregateTable> {
    let mut csv_reader = ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(AppError::InvalidData(
            "Cumulative flow data needs a date column and at least one stage column".to_string(),
        ));
    }
    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut index = Vec::new();
    let mut values = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(row + 2);

        let raw_date = record.get(0).unwrap_or_default();
        let date = parse_timestamp(raw_date)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| AppError::InvalidRecord {
                line,
                reason: format!("unrecognised date '{}'", raw_date),
            })?;

        let cells = record
            .iter()
            .skip(1)
            .map(|cell| {
                if cell.is_empty() {
                    Ok(0.0)
                } else {
                    cell.parse::<f64>().map_err(|_| AppError::InvalidRecord {
                        line,
                        reason: format!("'{}' is not a number", cell),
                    })
                }
            })
            .collect::<AppResult<Vec<f64>>>()?;

        index.push(date);
        values.push(cells);
    }

    AggregateTable::new(index, columns, values)
}
