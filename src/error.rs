//! Error types for the invoice reconciliation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading sources, joining
//! tables, generating invoice lines, and delivering results.
//!
//! Errors are scoped deliberately: some abort a single file's contribution,
//! some abort one cost-centre partition, and some are report-only. The batch
//! runner consults this scoping to implement partial-failure semantics.

use thiserror::Error;

/// The main error type for the invoice reconciliation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the pipeline.
///
/// # Example
///
/// ```
/// use invoice_engine::error::EngineError;
///
/// let error = EngineError::UnsupportedFormat {
///     path: "uploads/report.docx".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unsupported file format: uploads/report.docx");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A source file had an extension the loader does not understand.
    /// The batch skips the file and continues.
    #[error("Unsupported file format: {path}")]
    UnsupportedFormat {
        /// The path that was skipped.
        path: String,
    },

    /// A required named sheet was absent from a workbook. The file's
    /// contribution to the batch is aborted.
    #[error("Required sheet '{sheet}' not found in workbook: {path}")]
    MissingSheet {
        /// The expected sheet name.
        sheet: String,
        /// The workbook path.
        path: String,
    },

    /// An expected join or schema column was absent from a source table.
    /// Aborts the affected cost-centre partition.
    #[error("Expected column '{column}' missing from {table}")]
    SchemaMismatch {
        /// The missing column name.
        column: String,
        /// The logical table the column was expected in.
        table: String,
    },

    /// The period-end field could not be parsed as DD/MM/YYYY. Aborts the
    /// affected partition's line generation.
    #[error("Could not parse period end date '{value}' as DD/MM/YYYY")]
    DateParse {
        /// The unparseable field value.
        value: String,
    },

    /// The entity matcher found no registry row containing the payroll name.
    /// Aborts enrichment only; financial lines are unaffected.
    #[error("No organization registry entry matches payroll name '{name}'")]
    NoMatch {
        /// The payroll name that failed to match.
        name: String,
    },

    /// Webhook delivery failed. Reported, never retried, never rolls back
    /// produced outputs.
    #[error("Webhook delivery to {url} failed: {message}")]
    WebhookDelivery {
        /// The webhook endpoint.
        url: String,
        /// A description of the delivery failure.
        message: String,
    },

    /// A required logical source was absent from the batch's file set.
    #[error("No {kind} found among the batch source files")]
    MissingSource {
        /// The logical source kind, e.g. "payroll journal CSV".
        kind: String,
    },

    /// Two batch files carried the same logical source; the later one wins
    /// and the earlier contributes nothing.
    #[error("Duplicate {kind}: '{path}' was superseded by a later file in the batch")]
    DuplicateSource {
        /// The logical source kind, e.g. "payroll journal CSV".
        kind: String,
        /// The displaced file.
        path: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error on '{path}': {message}")]
    Io {
        /// The path involved.
        path: String,
        /// A description of the I/O error.
        message: String,
    },

    /// A CSV file could not be read or written.
    #[error("CSV error on '{path}': {message}")]
    Csv {
        /// The path involved.
        path: String,
        /// A description of the CSV error.
        message: String,
    },

    /// A workbook could not be opened or read.
    #[error("Workbook error on '{path}': {message}")]
    Workbook {
        /// The workbook path.
        path: String,
        /// A description of the workbook error.
        message: String,
    },

    /// Document rendering failed for one invoice.
    #[error("Render error for cost centre '{cost_centre}': {message}")]
    Render {
        /// The cost centre whose invoice failed to render.
        cost_centre: String,
        /// A description of the render failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_displays_path() {
        let error = EngineError::UnsupportedFormat {
            path: "uploads/report.docx".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported file format: uploads/report.docx"
        );
    }

    #[test]
    fn test_missing_sheet_displays_sheet_and_path() {
        let error = EngineError::MissingSheet {
            sheet: "Charge Sheet".to_string(),
            path: "uploads/reconciliation.xlsx".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Required sheet 'Charge Sheet' not found in workbook: uploads/reconciliation.xlsx"
        );
    }

    #[test]
    fn test_schema_mismatch_names_column_and_table() {
        let error = EngineError::SchemaMismatch {
            column: "Employee No.".to_string(),
            table: "payroll journal".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Expected column 'Employee No.' missing from payroll journal"
        );
        // The table name is plain context, not an underlying cause.
        assert!(std::error::Error::source(&error).is_none());
    }

    #[test]
    fn test_duplicate_source_names_displaced_file() {
        let error = EngineError::DuplicateSource {
            kind: "payroll journal CSV".to_string(),
            path: "uploads/stale.csv".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Duplicate payroll journal CSV: 'uploads/stale.csv' was superseded by a later file in the batch"
        );
    }

    #[test]
    fn test_date_parse_displays_value() {
        let error = EngineError::DateParse {
            value: "31/13/2024".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Could not parse period end date '31/13/2024' as DD/MM/YYYY"
        );
    }

    #[test]
    fn test_no_match_displays_name() {
        let error = EngineError::NoMatch {
            name: "zzz".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No organization registry entry matches payroll name 'zzz'"
        );
    }

    #[test]
    fn test_webhook_delivery_displays_url_and_message() {
        let error = EngineError::WebhookDelivery {
            url: "https://hooks.example.com/invoices".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Webhook delivery to https://hooks.example.com/invoices failed: connection refused"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_schema_mismatch() -> EngineResult<()> {
            Err(EngineError::SchemaMismatch {
                column: "Last Name".to_string(),
                table: "job classifications".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_schema_mismatch()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
