//! Configuration types for the invoice pipeline.
//!
//! The pipeline takes one explicit [`PipelineConfig`] object; there is no
//! module-level mutable state. The rate-mapping table is versioned reference
//! data loaded from YAML, not code.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// One (source quantity column → target rate column) mapping pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RatePair {
    /// The timesheet quantity column, e.g. `Normal Hourly (Qty)`.
    pub source: String,
    /// The charge-sheet rate column, e.g. `NT`.
    pub target: String,
}

/// The ordered rate-code mapping table.
///
/// Declaration order is a contract: pairs are evaluated in order, and that
/// order decides output ordering when units tie. Loaded from a versioned
/// YAML file such as `reference/fy24.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateMapping {
    /// Version tag of this mapping table, e.g. `fy24`.
    pub version: String,
    /// Ordered mapping pairs.
    pub pairs: Vec<RatePair>,
}

impl RateMapping {
    /// Builds a mapping from (source, target) column-name pairs.
    pub fn new(version: impl Into<String>, pairs: Vec<(&str, &str)>) -> Self {
        Self {
            version: version.into(),
            pairs: pairs
                .into_iter()
                .map(|(source, target)| RatePair {
                    source: source.to_string(),
                    target: target.to_string(),
                })
                .collect(),
        }
    }

    fn empty() -> Self {
        Self {
            version: "unversioned".to_string(),
            pairs: Vec::new(),
        }
    }
}

/// Explicit configuration for one pipeline instance.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Directory for merged per-cost-centre checkpoint CSVs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory for per-cost-centre invoice-line checkpoint CSVs.
    #[serde(default = "default_invoice_dir")]
    pub invoice_dir: PathBuf,
    /// Directory for rendered documents.
    #[serde(default = "default_rendered_dir")]
    pub rendered_dir: PathBuf,
    /// Optional delivery webhook endpoint. `None` disables delivery.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// GST rate applied to the subtotal.
    #[serde(default = "default_gst_rate")]
    pub gst_rate: Decimal,
    /// Header preamble rows skipped when reading the payroll CSV.
    #[serde(default = "default_csv_skip_rows")]
    pub csv_skip_rows: usize,
    /// Whether the filesystem-safe cost-centre label is embedded in line
    /// descriptions (per-deployment billing convention).
    #[serde(default)]
    pub embed_cost_centre_label: bool,
    /// Whether a `Payroll Name` column (split from `Payroll Name Selection`)
    /// is added to invoice lines and checkpoints.
    #[serde(default)]
    pub payroll_name_column: bool,
    /// Bound on concurrent render tasks. A tunable, not a correctness
    /// property.
    #[serde(default = "default_render_workers")]
    pub render_workers: usize,
    /// The rate-code mapping table.
    #[serde(default = "RateMapping::empty")]
    pub rate_mapping: RateMapping,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            invoice_dir: default_invoice_dir(),
            rendered_dir: default_rendered_dir(),
            webhook_url: None,
            gst_rate: default_gst_rate(),
            csv_skip_rows: default_csv_skip_rows(),
            embed_cost_centre_label: false,
            payroll_name_column: false,
            render_workers: default_render_workers(),
            rate_mapping: RateMapping::empty(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output_folder")
}

fn default_invoice_dir() -> PathBuf {
    PathBuf::from("invoice_folder")
}

fn default_rendered_dir() -> PathBuf {
    PathBuf::from("final_folder")
}

fn default_gst_rate() -> Decimal {
    Decimal::new(10, 2)
}

fn default_csv_skip_rows() -> usize {
    1
}

fn default_render_workers() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_deployment() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("output_folder"));
        assert_eq!(config.invoice_dir, PathBuf::from("invoice_folder"));
        assert_eq!(config.gst_rate, Decimal::new(10, 2));
        assert_eq!(config.csv_skip_rows, 1);
        assert!(!config.embed_cost_centre_label);
        assert!(config.rate_mapping.pairs.is_empty());
    }

    #[test]
    fn test_rate_mapping_new_preserves_declaration_order() {
        let mapping = RateMapping::new(
            "fy24",
            vec![("Normal Hourly (Qty)", "NT"), ("Overtime 2.0 (Qty)", "OT")],
        );
        assert_eq!(mapping.pairs[0].source, "Normal Hourly (Qty)");
        assert_eq!(mapping.pairs[1].target, "OT");
    }
}
