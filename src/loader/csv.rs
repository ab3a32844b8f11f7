//! CSV source reading.
//!
//! The payroll journal arrives as CSV with a preamble row above the real
//! header. Reading skips a configurable number of rows, takes the next row
//! as the header, and fills empty cells with a literal `"0"` so pay-code
//! columns behave as numeric zero downstream.

use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Table;

/// Reads a CSV file into a [`Table`].
///
/// # Arguments
///
/// * `path` - The CSV file to read
/// * `skip_rows` - Preamble rows to discard before the header row
///
/// # Returns
///
/// A table whose columns come from the first non-skipped row. Empty cells
/// are replaced with `"0"`. Rows shorter than the header are padded the same
/// way; cell text is otherwise preserved as written in the source.
pub fn read_csv(path: &Path, skip_rows: usize) -> EngineResult<Table> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let mut records = reader.records();
    for _ in 0..skip_rows {
        if let Some(record) = records.next() {
            record.map_err(|e| csv_error(path, e))?;
        }
    }

    let header = match records.next() {
        Some(record) => record.map_err(|e| csv_error(path, e))?,
        None => {
            return Err(EngineError::Csv {
                path: path.display().to_string(),
                message: format!("no header row after skipping {skip_rows} row(s)"),
            });
        }
    };

    let columns: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    let mut table = Table::new(columns);

    for record in records {
        let record = record.map_err(|e| csv_error(path, e))?;
        let mut row: Vec<String> = record.iter().map(zero_fill).collect();
        // Pad short rows with zero, matching the empty-cell fill.
        row.resize(table.columns().len(), "0".to_string());
        table.push_row(row);
    }

    Ok(table)
}

fn zero_fill(cell: &str) -> String {
    if cell.trim().is_empty() {
        "0".to_string()
    } else {
        cell.to_string()
    }
}

fn csv_error(path: &Path, e: ::csv::Error) -> EngineError {
    EngineError::Csv {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
