//! Invoice entities produced by the rate-mapping engine and the assembler.
//!
//! Monetary values are carried as [`Decimal`] rounded to two decimal places
//! and only become strings at emission time via [`money_string`]. This keeps
//! the observed per-line rounding semantics exact instead of re-deriving them
//! through floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Formats a monetary or quantity value with exactly two decimal places.
///
/// # Example
///
/// ```
/// use invoice_engine::models::money_string;
/// use rust_decimal::Decimal;
///
/// assert_eq!(money_string(Decimal::from(10)), "10.00");
/// ```
pub fn money_string(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Rounds to two decimal places with banker's rounding.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// A single billable line: one (employee row, mapped pay-code) pair with
/// non-zero unit and rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Serviced date range, `DD/MM/YYYY - DD/MM/YYYY`.
    pub serviced: String,
    /// Dash-joined description of classification, pay-code and employee.
    pub description: String,
    /// Unit quantity, rounded to 2 decimal places.
    pub unit: Decimal,
    /// Dollar rate per unit, rounded to 2 decimal places.
    pub rate: Decimal,
    /// `unit * rate`, rounded to 2 decimal places.
    pub amount: Decimal,
    /// Employee given names (job-classification side after the join).
    pub given_names: String,
    /// Employee last name.
    pub last_name: String,
    /// Cost centre this line bills against.
    pub cost_centre: String,
    /// Optional payroll entity name, split from `Payroll Name Selection`.
    pub payroll_name: Option<String>,
}

/// One row of an assembled invoice: either a billable line or the blank
/// separator inserted at employee boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceRow {
    /// A blank row; every rendered field is the empty string.
    Separator,
    /// A billable line.
    Line(InvoiceLine),
}

/// Invoice totals, each rounded to two decimals independently.
///
/// `gst` is rounded from `subtotal * rate` and `grand_total` from
/// `subtotal + gst`; neither is derived by formatting one high-precision
/// sum. This matches the observed behavior of the billing output and is a
/// compatibility requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of per-line rounded amounts.
    pub subtotal: Decimal,
    /// GST on the subtotal.
    pub gst: Decimal,
    /// Subtotal plus GST.
    pub grand_total: Decimal,
}

/// An assembled invoice for one cost centre: ordered rows (separators
/// included) plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Cost centre this invoice bills.
    pub cost_centre: String,
    /// Filesystem-safe cost-centre label (spaces replaced by underscores).
    pub label: String,
    /// Ordered invoice rows, blank separators included.
    pub rows: Vec<InvoiceRow>,
    /// Subtotal, GST and grand total.
    pub totals: InvoiceTotals,
}

impl Invoice {
    /// The billable lines of this invoice, separators skipped.
    pub fn lines(&self) -> impl Iterator<Item = &InvoiceLine> {
        self.rows.iter().filter_map(|row| match row {
            InvoiceRow::Line(line) => Some(line),
            InvoiceRow::Separator => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_money_string_pads_to_two_decimals() {
        assert_eq!(money_string(dec("250")), "250.00");
        assert_eq!(money_string(dec("0.5")), "0.50");
        assert_eq!(money_string(dec("19.125").round_dp(2)), "19.12");
    }

    #[test]
    fn test_round2_uses_bankers_rounding() {
        assert_eq!(round2(dec("2.675")), dec("2.68"));
        assert_eq!(round2(dec("2.665")), dec("2.66"));
        assert_eq!(round2(dec("2.625")), dec("2.62"));
    }

    #[test]
    fn test_lines_skips_separators() {
        let line = InvoiceLine {
            serviced: String::new(),
            description: "Tech-NT-Alice-Smith".to_string(),
            unit: dec("10"),
            rate: dec("25"),
            amount: dec("250"),
            given_names: "Alice".to_string(),
            last_name: "Smith".to_string(),
            cost_centre: "Ops A".to_string(),
            payroll_name: None,
        };
        let invoice = Invoice {
            cost_centre: "Ops A".to_string(),
            label: "Ops_A".to_string(),
            rows: vec![InvoiceRow::Separator, InvoiceRow::Line(line)],
            totals: InvoiceTotals {
                subtotal: dec("250"),
                gst: dec("25"),
                grand_total: dec("275"),
            },
        };
        assert_eq!(invoice.lines().count(), 1);
    }
}
