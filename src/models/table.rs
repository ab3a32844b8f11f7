//! The normalized tabular shape shared by every pipeline stage.
//!
//! A [`Table`] is an ordered list of named columns plus ordered rows of
//! literal string cells. Cells keep whatever text the source file carried;
//! numeric interpretation happens lazily via [`lossy_decimal`] so that the
//! literal source formatting survives until the formatting stage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// An immutable-by-convention table of named columns and string cells.
///
/// Row order is meaningful: joins preserve it and the rate-mapping engine
/// indexes rows in join-result order.
///
/// # Example
///
/// ```
/// use invoice_engine::models::Table;
///
/// let mut table = Table::new(vec!["Employee No.".into(), "Last Name".into()]);
/// table.push_row(vec!["1".into(), "Smith".into()]);
/// assert_eq!(table.get(0, "Last Name"), Some("Smith"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table from pre-built columns and rows.
    ///
    /// Short rows are padded with empty cells so every row matches the
    /// column count; long rows are truncated.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// The ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The ordered rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of a column, or a [`EngineError::SchemaMismatch`] naming the
    /// column and the logical table it was expected in.
    pub fn require_column(&self, name: &str, table: &str) -> EngineResult<usize> {
        self.column_index(name)
            .ok_or_else(|| EngineError::SchemaMismatch {
                column: name.to_string(),
                table: table.to_string(),
            })
    }

    /// Cell value addressed by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Renames a column in place. Unknown names are ignored.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(idx) = self.column_index(from) {
            self.columns[idx] = to.to_string();
        }
    }

    /// Removes a column and its cells. Unknown names are ignored.
    pub fn drop_column(&mut self, name: &str) {
        if let Some(idx) = self.column_index(name) {
            self.columns.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
    }

    /// Distinct values of a column in first-appearance order.
    pub fn unique_values(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.iter().any(|v| v == &row[idx]) {
                seen.push(row[idx].clone());
            }
        }
        seen
    }

    /// All values of one column as decimals via [`lossy_decimal`], in row
    /// order.
    pub fn decimal_column(&self, column: &str) -> Option<Vec<Decimal>> {
        let idx = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .map(|row| lossy_decimal(&row[idx]))
                .collect(),
        )
    }
}

/// Parses a cell as a decimal, treating empty or non-numeric text as zero.
///
/// This mirrors the zero-fill applied at load time: a pay-code cell that is
/// blank, or carries stray text, contributes nothing to an invoice.
pub fn lossy_decimal(cell: &str) -> Decimal {
    Decimal::from_str(cell.trim()).unwrap_or_else(|_| Decimal::ZERO)
}
