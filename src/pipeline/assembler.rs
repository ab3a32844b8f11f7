//! The invoice assembler: orders lines, inserts employee separators and
//! computes totals.
//!
//! Totals rounding is a compatibility contract: the subtotal sums per-line
//! rounded amounts, then GST and the grand total are each rounded to two
//! decimals independently of one another, never derived by formatting one
//! high-precision sum.

use rust_decimal::Decimal;

use crate::models::{Invoice, InvoiceLine, InvoiceRow, InvoiceTotals, round2};

/// Stable sort by (given names, last name), byte-wise ordinal comparison.
pub fn sort_lines(lines: &mut [InvoiceLine]) {
    lines.sort_by(|a, b| {
        a.given_names
            .cmp(&b.given_names)
            .then_with(|| a.last_name.cmp(&b.last_name))
    });
}

/// Assembles invoice lines into an [`Invoice`] for one cost centre.
///
/// Lines are sorted, zero-amount lines are dropped, and one blank separator
/// row is inserted immediately before each run of equal given names,
/// including before the very first line.
pub fn assemble(
    cost_centre: &str,
    label: &str,
    mut lines: Vec<InvoiceLine>,
    gst_rate: Decimal,
) -> Invoice {
    sort_lines(&mut lines);

    let mut rows = Vec::new();
    let mut subtotal = Decimal::ZERO;
    let mut current_given: Option<String> = None;

    for line in lines {
        if line.amount.is_zero() {
            continue;
        }
        if current_given.as_deref() != Some(line.given_names.as_str()) {
            rows.push(InvoiceRow::Separator);
            current_given = Some(line.given_names.clone());
        }
        subtotal += line.amount;
        rows.push(InvoiceRow::Line(line));
    }

    let gst = round2(subtotal * gst_rate);
    let grand_total = round2(subtotal + gst);

    Invoice {
        cost_centre: cost_centre.to_string(),
        label: label.to_string(),
        rows,
        totals: InvoiceTotals {
            subtotal,
            gst,
            grand_total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::money_string;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(given: &str, last: &str, amount: &str) -> InvoiceLine {
        InvoiceLine {
            serviced: "28/10/2024 - 03/11/2024".to_string(),
            description: format!("Tech-NT-{given}-{last}"),
            unit: dec("1.00"),
            rate: dec(amount),
            amount: dec(amount),
            given_names: given.to_string(),
            last_name: last.to_string(),
            cost_centre: "Ops A".to_string(),
            payroll_name: None,
        }
    }

    fn gst() -> Decimal {
        dec("0.10")
    }

    fn separator_positions(invoice: &Invoice) -> Vec<usize> {
        invoice
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| matches!(row, InvoiceRow::Separator))
            .map(|(idx, _)| idx)
            .collect()
    }

    #[test]
    fn test_separators_at_given_name_boundaries() {
        // Given names A, A, B, B, B, C: separators land immediately before
        // pre-insertion indices 0, 2 and 5.
        let lines = vec![
            line("A", "x", "1.00"),
            line("A", "y", "1.00"),
            line("B", "x", "1.00"),
            line("B", "y", "1.00"),
            line("B", "z", "1.00"),
            line("C", "x", "1.00"),
        ];
        let invoice = assemble("Ops A", "Ops_A", lines, gst());
        assert_eq!(separator_positions(&invoice), vec![0, 3, 7]);
        assert_eq!(invoice.rows.len(), 9);
    }

    #[test]
    fn test_lines_sorted_by_given_then_last_name() {
        let lines = vec![
            line("Bob", "Jones", "1.00"),
            line("Alice", "Young", "2.00"),
            line("Alice", "Smith", "3.00"),
        ];
        let invoice = assemble("Ops A", "Ops_A", lines, gst());
        let order: Vec<(String, String)> = invoice
            .lines()
            .map(|l| (l.given_names.clone(), l.last_name.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Alice".to_string(), "Smith".to_string()),
                ("Alice".to_string(), "Young".to_string()),
                ("Bob".to_string(), "Jones".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_amount_lines_are_excluded_before_separators() {
        let mut zero = line("Alice", "Smith", "1.00");
        zero.amount = Decimal::ZERO;
        let lines = vec![zero, line("Bob", "Jones", "5.00")];
        let invoice = assemble("Ops A", "Ops_A", lines, gst());
        assert_eq!(invoice.lines().count(), 1);
        // One group, one separator.
        assert_eq!(separator_positions(&invoice), vec![0]);
        assert_eq!(money_string(invoice.totals.subtotal), "5.00");
    }

    #[test]
    fn test_totals_round_independently() {
        // subtotal 33.35 -> gst 3.335 rounds (banker's) to 3.34;
        // grand total 36.69 needs no further rounding but is re-rounded
        // independently all the same.
        let lines = vec![line("Alice", "Smith", "33.35")];
        let invoice = assemble("Ops A", "Ops_A", lines, gst());
        assert_eq!(money_string(invoice.totals.subtotal), "33.35");
        assert_eq!(money_string(invoice.totals.gst), "3.34");
        assert_eq!(money_string(invoice.totals.grand_total), "36.69");
    }

    #[test]
    fn test_subtotal_sums_per_line_rounded_amounts() {
        let lines = vec![
            line("Alice", "Smith", "0.99"),
            line("Alice", "Smith", "0.99"),
            line("Bob", "Jones", "0.99"),
        ];
        let invoice = assemble("Ops A", "Ops_A", lines, gst());
        assert_eq!(money_string(invoice.totals.subtotal), "2.97");
        assert_eq!(money_string(invoice.totals.gst), "0.30");
        assert_eq!(money_string(invoice.totals.grand_total), "3.27");
    }

    #[test]
    fn test_empty_lines_assemble_to_zero_totals() {
        let invoice = assemble("Ops A", "Ops_A", Vec::new(), gst());
        assert!(invoice.rows.is_empty());
        assert_eq!(money_string(invoice.totals.subtotal), "0.00");
        assert_eq!(money_string(invoice.totals.grand_total), "0.00");
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut first = line("Alice", "Smith", "1.00");
        first.description = "first".to_string();
        let mut second = line("Alice", "Smith", "2.00");
        second.description = "second".to_string();
        let invoice = assemble("Ops A", "Ops_A", vec![first, second], gst());
        let descriptions: Vec<&str> = invoice.lines().map(|l| l.description.as_str()).collect();
        assert_eq!(descriptions, vec!["first", "second"]);
    }
}
