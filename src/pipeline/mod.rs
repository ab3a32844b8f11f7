//! The reconciliation pipeline.
//!
//! Stages, in data-flow order: the join engine merges payroll,
//! job-classification and charge-sheet tables into per-cost-centre
//! partitions; the rate-mapping engine expands each partition into invoice
//! lines; the assembler sorts, sections and totals them; the entity matcher
//! enriches the result with registry metadata. Checkpointing persists each
//! partition and its invoice lines as durable CSVs, and the batch runner
//! ties the stages together with partial-failure semantics.

pub mod assembler;
pub mod checkpoint;
pub mod entity_match;
pub mod merge;
pub mod rate_expansion;
mod runner;

pub use assembler::{assemble, sort_lines};
pub use entity_match::{match_client, match_organization};
pub use merge::{MergeDiagnostics, MergeResult, PartitionFailure, merge_sources};
pub use rate_expansion::{ExpansionOptions, expand_partition};
pub use runner::{BatchFailure, BatchReport, Pipeline, ProducedInvoice};
