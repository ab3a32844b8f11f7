//! The join engine: reconciles the three source tables into per-cost-centre
//! partitions.
//!
//! Join semantics are inner joins throughout: an employee present in only
//! one source yields no invoice lines. That data loss is accepted behavior,
//! but every dropped row is counted and surfaced in [`MergeDiagnostics`] so
//! a reconciliation run can be audited.

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{CostCentrePartition, LoadedSources, Table, cost_centre_label};

/// Payroll-side employee number join key.
pub const EMPLOYEE_NO: &str = "Employee No.";

/// Last-name join key, shared by payroll and job classifications.
pub const LAST_NAME: &str = "Last Name";

/// Given-names column; the job-classification side wins on collision.
pub const GIVEN_NAMES: &str = "Given Names";

/// Cost-centre partition key on the payroll journal.
pub const COST_CENTRE: &str = "Cost Centre";

/// Job classification key for the charge-sheet join.
pub const JOB_CLASSIFICATION: &str = "Job Classification";

/// Column renames applied to the job-classification table before joining.
/// This reconciles source column identities with the payroll journal's join
/// keys and is a mandatory step, not an optional normalization.
const COLUMN_RECONCILIATION: [(&str, &str); 2] = [
    ("Employee Number", EMPLOYEE_NO),
    ("First Name", GIVEN_NAMES),
];

/// Counts of rows dropped by inner-join semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeDiagnostics {
    /// Job-classification rows with no payroll match.
    pub unmatched_classification_rows: usize,
    /// Payroll rows with no job-classification match.
    pub unmatched_payroll_rows: usize,
    /// Merged rows whose job classification had no charge-sheet entry.
    pub unmatched_charge_rows: usize,
}

/// A cost-centre partition that could not be produced.
#[derive(Debug)]
pub struct PartitionFailure {
    /// The cost centre that failed.
    pub cost_centre: String,
    /// Why it failed.
    pub error: EngineError,
}

/// The outcome of merging one batch's sources.
#[derive(Debug)]
pub struct MergeResult {
    /// Per-cost-centre merged partitions, in first-appearance order.
    pub partitions: Vec<CostCentrePartition>,
    /// Partitions aborted by schema mismatches.
    pub failures: Vec<PartitionFailure>,
    /// Dropped-row counts across the whole merge.
    pub diagnostics: MergeDiagnostics,
}

/// Merges payroll, job-classification and charge-sheet tables, partitioned
/// by cost centre.
///
/// # Algorithm
///
/// 1. Rename job-classification columns to the payroll join-key names.
/// 2. Inner-join job-classification rows to payroll rows on
///    (`Employee No.`, `Last Name`); the job-classification `Given Names`
///    survives the collision, the payroll duplicate is discarded.
/// 3. Partition merged rows by cost centre, first-appearance order.
/// 4. Inner-join each partition against the charge sheet on
///    `Job Classification`, expanding one row per matching rate card.
///
/// A join key missing from payroll or job classifications fails the whole
/// merge (no partition can form). A missing `Job Classification` column
/// fails each affected partition individually; other partitions still
/// produce output.
pub fn merge_sources(sources: &LoadedSources) -> EngineResult<MergeResult> {
    let mut job = sources.job_classifications.clone();
    for (from, to) in COLUMN_RECONCILIATION {
        job.rename_column(from, to);
    }

    let job_emp = job.require_column(EMPLOYEE_NO, "job classifications")?;
    let job_last = job.require_column(LAST_NAME, "job classifications")?;
    let pay_emp = sources.payroll.require_column(EMPLOYEE_NO, "payroll journal")?;
    let pay_last = sources.payroll.require_column(LAST_NAME, "payroll journal")?;

    // Merged shape: job-classification columns first, then payroll columns
    // minus the join keys and the colliding Given Names duplicate.
    let payroll = &sources.payroll;
    let carried_payroll: Vec<usize> = payroll
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            name.as_str() != EMPLOYEE_NO
                && name.as_str() != LAST_NAME
                && name.as_str() != GIVEN_NAMES
        })
        .map(|(idx, _)| idx)
        .collect();

    let mut merged_columns: Vec<String> = job.columns().to_vec();
    merged_columns.extend(carried_payroll.iter().map(|&i| payroll.columns()[i].clone()));
    let mut merged = Table::new(merged_columns);

    let mut payroll_matched = vec![false; payroll.len()];
    let mut diagnostics = MergeDiagnostics::default();

    for job_row in job.rows() {
        let mut matched = false;
        for (pay_idx, pay_row) in payroll.rows().iter().enumerate() {
            if job_row[job_emp] == pay_row[pay_emp] && job_row[job_last] == pay_row[pay_last] {
                matched = true;
                payroll_matched[pay_idx] = true;
                let mut row = job_row.clone();
                row.extend(carried_payroll.iter().map(|&i| pay_row[i].clone()));
                merged.push_row(row);
            }
        }
        if !matched {
            diagnostics.unmatched_classification_rows += 1;
        }
    }
    diagnostics.unmatched_payroll_rows = payroll_matched.iter().filter(|m| !**m).count();

    if diagnostics.unmatched_classification_rows > 0 || diagnostics.unmatched_payroll_rows > 0 {
        warn!(
            unmatched_classification_rows = diagnostics.unmatched_classification_rows,
            unmatched_payroll_rows = diagnostics.unmatched_payroll_rows,
            "inner join dropped unmatched rows"
        );
    }

    let cc_idx = merged.require_column(COST_CENTRE, "merged payroll journal")?;

    let mut partitions = Vec::new();
    let mut failures = Vec::new();
    for cost_centre in merged.unique_values(COST_CENTRE) {
        match join_charge_sheet(
            &merged,
            cc_idx,
            &cost_centre,
            &sources.charge_sheet,
            &mut diagnostics,
        ) {
            Ok(table) => partitions.push(CostCentrePartition {
                label: cost_centre_label(&cost_centre),
                cost_centre,
                table,
            }),
            Err(error) => {
                warn!(cost_centre = %cost_centre, error = %error, "partition aborted");
                failures.push(PartitionFailure { cost_centre, error });
            }
        }
    }

    Ok(MergeResult {
        partitions,
        failures,
        diagnostics,
    })
}

/// Expands one cost centre's merged rows against the charge sheet.
///
/// Multiple rate cards per classification are legal: each match produces a
/// separate output row, in charge-sheet order within one merged row.
fn join_charge_sheet(
    merged: &Table,
    cc_idx: usize,
    cost_centre: &str,
    charge_sheet: &Table,
    diagnostics: &mut MergeDiagnostics,
) -> EngineResult<Table> {
    let merged_class = merged.require_column(JOB_CLASSIFICATION, "merged payroll journal")?;
    let charge_class = charge_sheet.require_column(JOB_CLASSIFICATION, "charge sheet")?;

    let carried_charge: Vec<usize> = charge_sheet
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != charge_class)
        .map(|(idx, _)| idx)
        .collect();

    let mut columns: Vec<String> = merged.columns().to_vec();
    columns.extend(
        carried_charge
            .iter()
            .map(|&i| charge_sheet.columns()[i].clone()),
    );
    let mut table = Table::new(columns);

    for row in merged.rows().iter().filter(|r| r[cc_idx] == cost_centre) {
        let mut matched = false;
        for charge_row in charge_sheet.rows() {
            if charge_row[charge_class] == row[merged_class] {
                matched = true;
                let mut out = row.clone();
                out.extend(carried_charge.iter().map(|&i| charge_row[i].clone()));
                table.push_row(out);
            }
        }
        if !matched {
            diagnostics.unmatched_charge_rows += 1;
        }
    }

    Ok(table)
}
