//! Durable CSV checkpoints, one per cost centre.
//!
//! Two checkpoint areas exist and both are part of the engine's contract:
//! the *output* area holds the merged+joined partition indexed by employee
//! number, and the *invoice* area holds the sorted invoice lines under the
//! exact header the downstream billing tooling expects.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::models::{InvoiceLine, Table, lossy_decimal, money_string};
use crate::pipeline::merge::EMPLOYEE_NO;

/// Invoice checkpoint header, in column order. `Payroll Name` is appended
/// when the payroll-name flag is on.
pub const INVOICE_COLUMNS: [&str; 8] = [
    "Serviced",
    "Description",
    "Unit",
    "Rate",
    "Amount",
    "Given Names",
    "Last Name",
    "Cost Centre",
];

/// Optional trailing invoice column.
pub const PAYROLL_NAME_COLUMN: &str = "Payroll Name";

/// Writes a merged partition to `<dir>/<label>.csv`.
///
/// The employee number column leads (it is the checkpoint's index); the
/// remaining columns keep their table order. Cell text is written as
/// stored, so reading the file back reproduces the partition.
pub fn write_partition(dir: &Path, label: &str, table: &Table) -> EngineResult<PathBuf> {
    let emp_idx = table.require_column(EMPLOYEE_NO, "merged partition")?;
    let path = dir.join(format!("{label}.csv"));
    ensure_dir(dir)?;

    let mut writer = ::csv::Writer::from_path(&path).map_err(|e| csv_error(&path, e))?;

    let mut header: Vec<&str> = vec![EMPLOYEE_NO];
    header.extend(
        table
            .columns()
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != emp_idx)
            .map(|(_, name)| name.as_str()),
    );
    writer.write_record(&header).map_err(|e| csv_error(&path, e))?;

    for row in table.rows() {
        let mut record: Vec<&str> = vec![row[emp_idx].as_str()];
        record.extend(
            row.iter()
                .enumerate()
                .filter(|(idx, _)| *idx != emp_idx)
                .map(|(_, cell)| cell.as_str()),
        );
        writer.write_record(&record).map_err(|e| csv_error(&path, e))?;
    }

    writer.flush().map_err(|e| EngineError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}

/// Reads a checkpoint CSV back into a [`Table`].
///
/// Unlike the source loader, no rows are skipped and no zero-fill is
/// applied: checkpoints are the engine's own format and round-trip as
/// written.
pub fn read_table(path: &Path) -> EngineResult<Table> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|c| c.to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        table.push_row(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(table)
}

/// Writes sorted invoice lines to `<dir>/<label>_invoice.csv` under the
/// exact contract header.
pub fn write_invoice_lines(
    dir: &Path,
    label: &str,
    lines: &[InvoiceLine],
    payroll_name_column: bool,
) -> EngineResult<PathBuf> {
    let path = dir.join(format!("{label}_invoice.csv"));
    ensure_dir(dir)?;

    let mut writer = ::csv::Writer::from_path(&path).map_err(|e| csv_error(&path, e))?;

    let mut header: Vec<&str> = INVOICE_COLUMNS.to_vec();
    if payroll_name_column {
        header.push(PAYROLL_NAME_COLUMN);
    }
    writer.write_record(&header).map_err(|e| csv_error(&path, e))?;

    for line in lines {
        let mut record = vec![
            line.serviced.clone(),
            line.description.clone(),
            money_string(line.unit),
            money_string(line.rate),
            money_string(line.amount),
            line.given_names.clone(),
            line.last_name.clone(),
            line.cost_centre.clone(),
        ];
        if payroll_name_column {
            record.push(line.payroll_name.clone().unwrap_or_default());
        }
        writer.write_record(&record).map_err(|e| csv_error(&path, e))?;
    }

    writer.flush().map_err(|e| EngineError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}

/// Reads an invoice checkpoint back into lines.
pub fn read_invoice_lines(path: &Path) -> EngineResult<Vec<InvoiceLine>> {
    let table = read_table(path)?;
    for column in INVOICE_COLUMNS {
        table.require_column(column, "invoice checkpoint")?;
    }
    let has_payroll_name = table.has_column(PAYROLL_NAME_COLUMN);

    let mut lines = Vec::with_capacity(table.len());
    for i in 0..table.len() {
        let cell = |name: &str| table.get(i, name).unwrap_or_default().to_string();
        lines.push(InvoiceLine {
            serviced: cell("Serviced"),
            description: cell("Description"),
            unit: lossy_decimal(&cell("Unit")),
            rate: lossy_decimal(&cell("Rate")),
            amount: lossy_decimal(&cell("Amount")),
            given_names: cell("Given Names"),
            last_name: cell("Last Name"),
            cost_centre: cell("Cost Centre"),
            payroll_name: has_payroll_name.then(|| cell(PAYROLL_NAME_COLUMN)),
        });
    }
    Ok(lines)
}

fn ensure_dir(dir: &Path) -> EngineResult<()> {
    fs::create_dir_all(dir).map_err(|e| EngineError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    })
}

fn csv_error(path: &Path, e: ::csv::Error) -> EngineError {
    EngineError::Csv {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
