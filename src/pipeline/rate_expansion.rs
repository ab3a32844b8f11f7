//! The rate-mapping engine: turns wide timesheet quantity columns into
//! normalized invoice lines.
//!
//! Mapping pairs are evaluated in declaration order; that order decides how
//! lines interleave before the assembler's sort, so it is a contract rather
//! than an implementation detail. Rows are indexed in join-result order.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::config::RateMapping;
use crate::error::{EngineError, EngineResult};
use crate::models::{CostCentrePartition, InvoiceLine, round2};
use crate::pipeline::merge::{GIVEN_NAMES, JOB_CLASSIFICATION, LAST_NAME};

/// Column holding the pay period end date, `DD/MM/YYYY`.
pub const PERIOD_END_DATE: &str = "Period End Date";

/// Column whose leading dash-separated segment names the payroll entity.
pub const PAYROLL_NAME_SELECTION: &str = "Payroll Name Selection";

/// Per-deployment formatting variants for line expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpansionOptions {
    /// Embed the filesystem-safe cost-centre label in line descriptions.
    pub embed_cost_centre_label: bool,
    /// Carry a payroll name split from `Payroll Name Selection`.
    pub payroll_name_column: bool,
}

/// Expands one cost-centre partition into invoice lines.
///
/// For each (source, target) mapping pair in declaration order:
/// - skipped if either column is absent from the partition;
/// - skipped if every source value or every target value is zero across the
///   partition (an all-zero column contributes nothing);
/// - otherwise each row with non-zero unit and rate emits one line with
///   `amount = round2(unit * rate)`.
///
/// The serviced range derives from the FIRST row's period end date only
/// (all lines in a partition share one period): `[end - 6 days, end]` as
/// `DD/MM/YYYY - DD/MM/YYYY`. An unparseable period end fails the whole
/// partition's line generation with [`EngineError::DateParse`].
pub fn expand_partition(
    partition: &CostCentrePartition,
    mapping: &RateMapping,
    options: ExpansionOptions,
) -> EngineResult<Vec<InvoiceLine>> {
    let table = &partition.table;
    let mut lines = Vec::new();
    let mut serviced: Option<String> = None;

    for pair in &mapping.pairs {
        let (Some(units), Some(rates)) = (
            table.decimal_column(&pair.source),
            table.decimal_column(&pair.target),
        ) else {
            continue;
        };
        if units.iter().all(Decimal::is_zero) || rates.iter().all(Decimal::is_zero) {
            continue;
        }

        let class_idx = table.require_column(JOB_CLASSIFICATION, "merged partition")?;
        let given_idx = table.require_column(GIVEN_NAMES, "merged partition")?;
        let last_idx = table.require_column(LAST_NAME, "merged partition")?;
        let payroll_idx = if options.payroll_name_column {
            Some(table.require_column(PAYROLL_NAME_SELECTION, "merged partition")?)
        } else {
            None
        };

        if serviced.is_none() {
            let date_idx = table.require_column(PERIOD_END_DATE, "merged partition")?;
            let first = table
                .rows()
                .first()
                .map(|row| row[date_idx].as_str())
                .unwrap_or_default();
            serviced = Some(serviced_period(first)?);
        }
        let serviced_value = serviced.clone().unwrap_or_default();

        for (i, row) in table.rows().iter().enumerate() {
            let unit = round2(units[i]);
            let rate = round2(rates[i]);
            if unit.is_zero() || rate.is_zero() {
                continue;
            }

            let mut parts = vec![row[class_idx].as_str()];
            if options.embed_cost_centre_label {
                parts.push(partition.label.as_str());
            }
            parts.push(pair.target.as_str());
            parts.push(row[given_idx].as_str());
            parts.push(row[last_idx].as_str());

            lines.push(InvoiceLine {
                serviced: serviced_value.clone(),
                description: parts.join("-"),
                unit,
                rate,
                amount: round2(units[i] * rates[i]),
                given_names: row[given_idx].clone(),
                last_name: row[last_idx].clone(),
                cost_centre: partition.cost_centre.clone(),
                payroll_name: payroll_idx
                    .map(|idx| row[idx].split('-').next().unwrap_or_default().to_string()),
            });
        }
    }

    Ok(lines)
}

/// Formats the serviced range `[end - 6 days, end]` from a `DD/MM/YYYY`
/// period end value.
fn serviced_period(period_end: &str) -> EngineResult<String> {
    let end = NaiveDate::parse_from_str(period_end.trim(), "%d/%m/%Y").map_err(|_| {
        EngineError::DateParse {
            value: period_end.to_string(),
        }
    })?;
    let start = end - Duration::days(6);
    Ok(format!(
        "{} - {}",
        start.format("%d/%m/%Y"),
        end.format("%d/%m/%Y")
    ))
}
