//! Core data models for the invoice reconciliation engine.
//!
//! This module contains all the domain entities used throughout the
//! pipeline: the normalized [`Table`] shape, typed source records, invoice
//! lines and totals, and enrichment records.

mod invoice;
mod organization;
mod sources;
mod table;

pub use invoice::{Invoice, InvoiceLine, InvoiceRow, InvoiceTotals, money_string, round2};
pub use organization::{ClientRecord, OrganizationMatch};
pub use sources::{CostCentrePartition, LoadedSources, SourceKind, cost_centre_label};
pub use table::{Table, lossy_decimal};
