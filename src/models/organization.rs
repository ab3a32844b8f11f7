//! Enrichment records resolved from the organization registry and the
//! client/project lookup. Neither participates in the financial computation;
//! they only decorate rendered documents and the delivery summary.

use serde::{Deserialize, Serialize};

/// The registry row that matched a payroll entity name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMatch {
    /// The contract entity name as it appears in the registry.
    pub contract_entity: String,
    /// All (column, value) pairs of the matched registry row.
    pub fields: Vec<(String, String)>,
}

impl OrganizationMatch {
    /// Value of one registry column, if present.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// An optional client/project lookup row passed through to the renderer
/// and webhook summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Display name for the client.
    pub display_name: String,
    /// All (column, value) pairs of the matched lookup row.
    pub fields: Vec<(String, String)>,
}
