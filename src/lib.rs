//! Cost-Centre Invoice Reconciliation Engine
//!
//! This crate ingests payroll/timesheet and billing spreadsheets, joins them
//! against reference tables, computes per-employee billable line items, and
//! assembles one invoice per cost centre with GST totals. Document rendering
//! and webhook delivery sit behind boundary interfaces.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod webhook;
