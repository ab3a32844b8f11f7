//! Partial-match resolution of payroll entity names against the
//! organization registry.
//!
//! Matching is substring containment, not equality: both sides are
//! normalized by removing spaces and lower-casing, and a registry row
//! matches when its contract-entity value contains the payroll name. The
//! first matching row in registry order wins; there is no scoring.
//! A miss only blocks header enrichment, never financial lines.

use crate::error::{EngineError, EngineResult};
use crate::models::{ClientRecord, OrganizationMatch, Table};

/// Registry column holding the legal contract entity name.
pub const CONTRACT_ENTITY: &str = "Contract Entity";

/// Client-lookup column holding the client display name.
pub const CLIENT_NAME: &str = "Client Name";

fn normalize(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}

fn row_fields(table: &Table, row: &[String]) -> Vec<(String, String)> {
    table
        .columns()
        .iter()
        .zip(row.iter())
        .map(|(c, v)| (c.clone(), v.clone()))
        .collect()
}

/// Finds the first registry row whose contract entity contains the payroll
/// name.
///
/// # Errors
///
/// - [`EngineError::SchemaMismatch`] if the registry lacks the
///   `Contract Entity` column
/// - [`EngineError::NoMatch`] if no row contains the normalized name
pub fn match_organization(
    payroll_name: &str,
    registry: &Table,
) -> EngineResult<OrganizationMatch> {
    let entity_idx = registry.require_column(CONTRACT_ENTITY, "organization registry")?;
    let needle = normalize(payroll_name);

    for row in registry.rows() {
        if normalize(&row[entity_idx]).contains(&needle) {
            return Ok(OrganizationMatch {
                contract_entity: row[entity_idx].clone(),
                fields: row_fields(registry, row),
            });
        }
    }

    Err(EngineError::NoMatch {
        name: payroll_name.to_string(),
    })
}

/// Resolves the optional client/project lookup row with the same
/// containment rule, keyed on the `Client Name` column.
///
/// Absence of a match is not an error; the lookup is best-effort
/// enrichment.
pub fn match_client(payroll_name: &str, clients: &Table) -> Option<ClientRecord> {
    let name_idx = clients.column_index(CLIENT_NAME)?;
    let needle = normalize(payroll_name);

    clients
        .rows()
        .iter()
        .find(|row| normalize(&row[name_idx]).contains(&needle))
        .map(|row| ClientRecord {
            display_name: row[name_idx].clone(),
            fields: row_fields(clients, row),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Table {
        Table::from_parts(
            vec!["Contract Entity".into(), "ABN".into()],
            vec![
                vec!["ACME Pty Ltd".into(), "11 222 333 444".into()],
                vec!["Beta Corp".into(), "55 666 777 888".into()],
            ],
        )
    }

    #[test]
    fn test_partial_name_matches_containing_entity() {
        let m = match_organization("acme", &registry()).unwrap();
        assert_eq!(m.contract_entity, "ACME Pty Ltd");
        assert_eq!(m.field("ABN"), Some("11 222 333 444"));
    }

    #[test]
    fn test_match_ignores_spaces_and_case() {
        let m = match_organization("A C M E pty", &registry()).unwrap();
        assert_eq!(m.contract_entity, "ACME Pty Ltd");
    }

    #[test]
    fn test_no_containing_entity_is_no_match() {
        let err = match_organization("zzz", &registry()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No organization registry entry matches payroll name 'zzz'"
        );
    }

    #[test]
    fn test_first_registry_row_wins_without_scoring() {
        let table = Table::from_parts(
            vec!["Contract Entity".into()],
            vec![
                vec!["Acme Holdings".into()],
                vec!["Acme".into()], // exact, but later
            ],
        );
        let m = match_organization("acme", &table).unwrap();
        assert_eq!(m.contract_entity, "Acme Holdings");
    }

    #[test]
    fn test_missing_contract_entity_column_is_schema_mismatch() {
        let table = Table::from_parts(vec!["Name".into()], vec![vec!["ACME".into()]]);
        let err = match_organization("acme", &table).unwrap_err();
        assert!(matches!(err, EngineError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_client_lookup_is_best_effort() {
        let clients = Table::from_parts(
            vec!["Client Name".into(), "Project".into()],
            vec![vec!["ACME Pty Ltd".into(), "Plant upgrade".into()]],
        );
        let client = match_client("acme", &clients).unwrap();
        assert_eq!(client.display_name, "ACME Pty Ltd");
        assert!(match_client("zzz", &clients).is_none());
    }
}
