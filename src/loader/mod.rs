//! Tabular source loading.
//!
//! Given file paths and logical source kinds, the loader produces the
//! normalized [`Table`] shape consumed by the join engine. CSV files become
//! the payroll journal; XLSX/XLSM workbooks contribute the
//! job-classification and charge-sheet reference tables. Files with any
//! other extension are skipped with a report and the batch continues.

mod csv;
mod workbook;

pub use csv::read_csv;
pub use workbook::{CHARGE_SHEET_SHEET, JOB_CLASSIFICATIONS_SHEET, read_workbook};

use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{LoadedSources, SourceKind};

/// A source file the loader refused, with the reason it was skipped.
#[derive(Debug)]
pub struct SkippedFile {
    /// The offending path.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: EngineError,
}

/// Classifies a source file by extension.
///
/// Returns `None` for extensions the loader does not understand.
pub fn detect_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(SourceKind::PayrollJournal),
        "xlsx" | "xlsm" => Some(SourceKind::ReferenceWorkbook),
        _ => None,
    }
}

/// Loads the batch's source files into one typed [`LoadedSources`] record.
///
/// Files with unsupported extensions are reported in the skipped list and
/// do not fail the batch. When two files carry the same logical source the
/// later one wins and the displaced file is reported as skipped. A missing
/// required source (no payroll CSV, or no workbook carrying both reference
/// sheets) fails with [`EngineError::MissingSource`].
pub fn load_sources(
    paths: &[PathBuf],
    csv_skip_rows: usize,
) -> EngineResult<(LoadedSources, Vec<SkippedFile>)> {
    let mut payroll = None;
    let mut reference = None;
    let mut skipped = Vec::new();

    for path in paths {
        match detect_kind(path) {
            Some(SourceKind::PayrollJournal) => match read_csv(path, csv_skip_rows) {
                Ok(table) => {
                    if let Some((displaced, _)) = payroll.replace((path.clone(), table)) {
                        skipped.push(superseded(displaced, "payroll journal CSV"));
                    }
                }
                Err(reason) => {
                    warn!(path = %path.display(), error = %reason, "payroll journal unreadable");
                    skipped.push(SkippedFile {
                        path: path.clone(),
                        reason,
                    });
                }
            },
            Some(SourceKind::ReferenceWorkbook) => match read_workbook(path) {
                Ok(tables) => {
                    if let Some((displaced, _)) = reference.replace((path.clone(), tables)) {
                        skipped.push(superseded(displaced, "reference workbook"));
                    }
                }
                Err(reason) => {
                    // A missing expected sheet aborts this file's whole
                    // contribution, not just the absent sheet.
                    warn!(path = %path.display(), error = %reason, "reference workbook unreadable");
                    skipped.push(SkippedFile {
                        path: path.clone(),
                        reason,
                    });
                }
            },
            None => {
                let reason = EngineError::UnsupportedFormat {
                    path: path.display().to_string(),
                };
                warn!(path = %path.display(), "skipping unsupported source file");
                skipped.push(SkippedFile {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    let (_, payroll) = payroll.ok_or_else(|| EngineError::MissingSource {
        kind: "payroll journal CSV".to_string(),
    })?;
    let (_, (job_classifications, charge_sheet)) = reference.ok_or_else(|| {
        EngineError::MissingSource {
            kind: "reference workbook".to_string(),
        }
    })?;

    Ok((
        LoadedSources {
            payroll,
            job_classifications,
            charge_sheet,
        },
        skipped,
    ))
}

fn superseded(path: PathBuf, kind: &str) -> SkippedFile {
    warn!(path = %path.display(), kind, "earlier source file superseded by a later one");
    SkippedFile {
        reason: EngineError::DuplicateSource {
            kind: kind.to_string(),
            path: path.display().to_string(),
        },
        path,
    }
}
