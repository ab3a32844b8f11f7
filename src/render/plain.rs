//! A plain-text stand-in renderer.
//!
//! Useful for tests and deployments without a PDF toolchain: it writes the
//! invoice rows as aligned text columns with the totals block underneath.
//! Real deployments substitute their own [`DocumentRenderer`].

use std::fmt::Write as _;

use super::{DocumentRenderer, RenderJob, RenderedDocument};
use crate::error::EngineResult;
use crate::models::{InvoiceRow, money_string};

/// Renders invoices as tab-separated text documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRenderer;

impl DocumentRenderer for PlainTextRenderer {
    fn render(&self, job: &RenderJob) -> EngineResult<RenderedDocument> {
        let invoice = &job.invoice;
        let mut out = String::new();

        let _ = writeln!(out, "TAX INVOICE - {}", invoice.cost_centre);
        if let Some(org) = &job.organization {
            let _ = writeln!(out, "Entity: {}", org.contract_entity);
        }
        if let Some(client) = &job.client {
            let _ = writeln!(out, "Client: {}", client.display_name);
        }
        let _ = writeln!(out, "Serviced\tDescription\tUnit\tRate\tAmount");

        for row in &invoice.rows {
            match row {
                InvoiceRow::Separator => {
                    let _ = writeln!(out, "\t\t\t\t");
                }
                InvoiceRow::Line(line) => {
                    let _ = writeln!(
                        out,
                        "{}\t{}\t{}\t{}\t{}",
                        line.serviced,
                        line.description,
                        money_string(line.unit),
                        money_string(line.rate),
                        money_string(line.amount),
                    );
                }
            }
        }

        let _ = writeln!(out, "Subtotal\t{}", money_string(invoice.totals.subtotal));
        let _ = writeln!(out, "GST\t{}", money_string(invoice.totals.gst));
        let _ = writeln!(
            out,
            "Grand Total\t{}",
            money_string(invoice.totals.grand_total)
        );

        Ok(RenderedDocument {
            file_name: format!("{}_invoice.txt", invoice.label),
            bytes: out.into_bytes(),
        })
    }
}
