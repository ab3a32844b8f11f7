//! Workbook (XLSX/XLSM) source reading.
//!
//! The reference workbook carries two named sheets: `Job_Classifications`
//! (employee → job classification) and `Charge Sheet` (job classification →
//! rate columns). Each is extracted into the same normalized [`Table`] shape
//! the CSV loader produces, with the first sheet row as the header.

use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Table;

/// Name of the job-classification sheet.
pub const JOB_CLASSIFICATIONS_SHEET: &str = "Job_Classifications";

/// Name of the charge-sheet sheet.
pub const CHARGE_SHEET_SHEET: &str = "Charge Sheet";

/// Reads the two expected named sheets from a workbook.
///
/// # Returns
///
/// `(job_classifications, charge_sheet)` tables, or:
/// - [`EngineError::MissingSheet`] if either expected sheet is absent
/// - [`EngineError::Workbook`] if the file cannot be opened or read
pub fn read_workbook(path: &Path) -> EngineResult<(Table, Table)> {
    let mut workbook = open_workbook_auto(path).map_err(|e| EngineError::Workbook {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let job_classifications = extract_sheet(&mut workbook, path, JOB_CLASSIFICATIONS_SHEET)?;
    let charge_sheet = extract_sheet(&mut workbook, path, CHARGE_SHEET_SHEET)?;
    Ok((job_classifications, charge_sheet))
}

fn extract_sheet(
    workbook: &mut calamine::Sheets<std::io::BufReader<std::fs::File>>,
    path: &Path,
    sheet: &str,
) -> EngineResult<Table> {
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(EngineError::MissingSheet {
            sheet: sheet.to_string(),
            path: path.display().to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| EngineError::Workbook {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(cells) => cells.iter().map(cell_text).collect::<Vec<_>>(),
        None => {
            return Err(EngineError::Workbook {
                path: path.display().to_string(),
                message: format!("sheet '{sheet}' is empty"),
            });
        }
    };

    let mut table = Table::new(header);
    for cells in rows {
        table.push_row(cells.iter().map(cell_text).collect());
    }
    Ok(table)
}

/// Converts one workbook cell to its literal textual form.
///
/// Whole-number floats render without a trailing `.0` so rate and quantity
/// cells keep the formatting the rest of the pipeline expects.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_text_drops_trailing_zero_fraction() {
        assert_eq!(float_text(25.0), "25");
        assert_eq!(float_text(25.5), "25.5");
        assert_eq!(float_text(-3.0), "-3");
    }

    #[test]
    fn test_cell_text_preserves_strings_and_blanks() {
        assert_eq!(cell_text(&Data::String("Tech".to_string())), "Tech");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Float(25.0)), "25");
    }
}
