//! Typed source records addressed by tag rather than file path.

use serde::{Deserialize, Serialize};

use super::Table;

/// The logical kind of a source file handed to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The payroll journal CSV: one row per employee per pay period, with
    /// one column per pay-code quantity.
    PayrollJournal,
    /// The reference workbook carrying the `Job_Classifications` and
    /// `Charge Sheet` sheets.
    ReferenceWorkbook,
}

/// All three source tables of one batch, loaded and normalized.
#[derive(Debug, Clone)]
pub struct LoadedSources {
    /// Payroll journal rows.
    pub payroll: Table,
    /// Employee number → job classification reference.
    pub job_classifications: Table,
    /// Job classification → rate columns reference.
    pub charge_sheet: Table,
}

/// The merged and rate-joined rows of one cost centre.
#[derive(Debug, Clone)]
pub struct CostCentrePartition {
    /// The cost centre value as it appears in the payroll journal.
    pub cost_centre: String,
    /// Filesystem-safe label: spaces replaced by underscores.
    pub label: String,
    /// Merged rows for this cost centre, in join-result order.
    pub table: Table,
}

/// Turns a cost-centre value into its filesystem-safe label.
pub fn cost_centre_label(cost_centre: &str) -> String {
    cost_centre.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_centre_label_replaces_spaces() {
        assert_eq!(cost_centre_label("Ops A"), "Ops_A");
        assert_eq!(cost_centre_label("Melbourne Site Works"), "Melbourne_Site_Works");
        assert_eq!(cost_centre_label("Depot"), "Depot");
    }
}
