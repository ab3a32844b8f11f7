//! Batch orchestration: one call runs a full reconciliation batch from
//! source files to rendered, delivered invoices.
//!
//! Failure isolation is the organizing principle. Per-file problems skip
//! the file; per-partition problems abort that cost centre; enrichment and
//! delivery problems never touch the financial output. The [`BatchReport`]
//! enumerates everything that was produced and everything that failed;
//! there is no global rollback.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::{EngineError, EngineResult};
use crate::loader::{SkippedFile, load_sources};
use crate::models::{ClientRecord, Invoice, OrganizationMatch, Table, money_string};
use crate::pipeline::assembler::{assemble, sort_lines};
use crate::pipeline::checkpoint;
use crate::pipeline::entity_match::{match_client, match_organization};
use crate::pipeline::merge::{MergeDiagnostics, merge_sources};
use crate::pipeline::rate_expansion::{
    ExpansionOptions, PAYROLL_NAME_SELECTION, expand_partition,
};
use crate::render::{DocumentRenderer, RenderJob, render_all};
use crate::webhook::{DeliverySummary, deliver};

/// One successfully produced invoice and its artifacts.
#[derive(Debug)]
pub struct ProducedInvoice {
    /// The cost centre billed.
    pub cost_centre: String,
    /// Filesystem-safe label, used in all artifact names.
    pub label: String,
    /// Path of the merged-partition checkpoint.
    pub output_checkpoint: PathBuf,
    /// Path of the invoice-line checkpoint.
    pub invoice_checkpoint: PathBuf,
    /// Path of the rendered document, if rendering succeeded.
    pub rendered_path: Option<PathBuf>,
    /// Grand total, 2-decimal string.
    pub grand_total: String,
}

/// One isolated failure, with the context it occurred in.
#[derive(Debug)]
pub struct BatchFailure {
    /// Human-readable context, e.g. `partition 'Ops A'`.
    pub context: String,
    /// The underlying error.
    pub error: EngineError,
}

/// The outcome of one batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// Invoices produced, in cost-centre partition order.
    pub produced: Vec<ProducedInvoice>,
    /// Every isolated failure, in occurrence order.
    pub failures: Vec<BatchFailure>,
    /// Source files skipped at load time.
    pub skipped_files: Vec<SkippedFile>,
    /// Rows dropped by inner-join semantics.
    pub diagnostics: MergeDiagnostics,
}

impl BatchReport {
    /// A user-facing summary: which outputs were produced, plus enumerated
    /// failure reasons. Produced even when some partitions failed.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Produced {} invoice(s): {}",
            self.produced.len(),
            self.produced
                .iter()
                .map(|p| p.invoice_checkpoint.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );
        if self.diagnostics != MergeDiagnostics::default() {
            out.push_str(&format!(
                "\nDropped rows: {} classification, {} payroll, {} without charge-sheet entry",
                self.diagnostics.unmatched_classification_rows,
                self.diagnostics.unmatched_payroll_rows,
                self.diagnostics.unmatched_charge_rows,
            ));
        }
        for skipped in &self.skipped_files {
            out.push_str(&format!(
                "\nSkipped {}: {}",
                skipped.path.display(),
                skipped.reason
            ));
        }
        for failure in &self.failures {
            out.push_str(&format!("\nFailed {}: {}", failure.context, failure.error));
        }
        out
    }
}

struct StagedInvoice {
    invoice: Invoice,
    output_checkpoint: PathBuf,
    invoice_checkpoint: PathBuf,
    organization: Option<OrganizationMatch>,
    client: Option<ClientRecord>,
}

/// The reconciliation pipeline: explicit configuration in, invoices out.
pub struct Pipeline {
    config: PipelineConfig,
    renderer: Arc<dyn DocumentRenderer>,
    registry: Option<Table>,
    clients: Option<Table>,
    http: reqwest::Client,
}

impl Pipeline {
    /// Creates a pipeline with the given configuration and renderer.
    pub fn new(config: PipelineConfig, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self {
            config,
            renderer,
            registry: None,
            clients: None,
            http: reqwest::Client::new(),
        }
    }

    /// Attaches the read-only organization registry used for enrichment.
    pub fn with_registry(mut self, registry: Table) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Attaches the read-only client/project lookup table.
    pub fn with_clients(mut self, clients: Table) -> Self {
        self.clients = Some(clients);
        self
    }

    /// Runs one batch over the given source files.
    ///
    /// Returns an error only when no work is possible at all (no loadable
    /// payroll journal or reference workbook); every narrower problem is
    /// isolated and enumerated in the report.
    pub async fn run(&self, paths: &[PathBuf]) -> EngineResult<BatchReport> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, files = paths.len(), "starting invoice batch");

        let (sources, skipped_files) = load_sources(paths, self.config.csv_skip_rows)?;
        let merge = merge_sources(&sources)?;

        let mut failures: Vec<BatchFailure> = merge
            .failures
            .into_iter()
            .map(|f| BatchFailure {
                context: format!("partition '{}'", f.cost_centre),
                error: f.error,
            })
            .collect();

        let options = ExpansionOptions {
            embed_cost_centre_label: self.config.embed_cost_centre_label,
            payroll_name_column: self.config.payroll_name_column,
        };

        let mut staged = Vec::new();
        for partition in &merge.partitions {
            let output_checkpoint = match checkpoint::write_partition(
                &self.config.output_dir,
                &partition.label,
                &partition.table,
            ) {
                Ok(path) => path,
                Err(error) => {
                    failures.push(BatchFailure {
                        context: format!("partition '{}'", partition.cost_centre),
                        error,
                    });
                    continue;
                }
            };

            let mut lines =
                match expand_partition(partition, &self.config.rate_mapping, options) {
                    Ok(lines) => lines,
                    Err(error) => {
                        failures.push(BatchFailure {
                            context: format!("partition '{}'", partition.cost_centre),
                            error,
                        });
                        continue;
                    }
                };
            sort_lines(&mut lines);

            let invoice_checkpoint = match checkpoint::write_invoice_lines(
                &self.config.invoice_dir,
                &partition.label,
                &lines,
                options.payroll_name_column,
            ) {
                Ok(path) => path,
                Err(error) => {
                    failures.push(BatchFailure {
                        context: format!("partition '{}'", partition.cost_centre),
                        error,
                    });
                    continue;
                }
            };

            let invoice = assemble(
                &partition.cost_centre,
                &partition.label,
                lines,
                self.config.gst_rate,
            );

            let payroll_name = payroll_entity_name(partition, &invoice);
            let organization = match (&self.registry, payroll_name.as_deref()) {
                (Some(registry), Some(name)) => match match_organization(name, registry) {
                    Ok(matched) => Some(matched),
                    Err(error) => {
                        // Enrichment only: header metadata is lost, the
                        // financial lines are kept.
                        warn!(cost_centre = %partition.cost_centre, error = %error, "enrichment skipped");
                        failures.push(BatchFailure {
                            context: format!("enrichment for '{}'", partition.cost_centre),
                            error,
                        });
                        None
                    }
                },
                _ => None,
            };
            let client = match (&self.clients, payroll_name.as_deref()) {
                (Some(clients), Some(name)) => match_client(name, clients),
                _ => None,
            };

            staged.push(StagedInvoice {
                invoice,
                output_checkpoint,
                invoice_checkpoint,
                organization,
                client,
            });
        }

        let jobs: Vec<RenderJob> = staged
            .iter()
            .map(|s| RenderJob {
                invoice: s.invoice.clone(),
                organization: s.organization.clone(),
                client: s.client.clone(),
            })
            .collect();
        let rendered = render_all(
            Arc::clone(&self.renderer),
            jobs,
            self.config.render_workers,
        )
        .await;

        let mut produced = Vec::with_capacity(staged.len());
        for (stage, render_result) in staged.into_iter().zip(rendered) {
            let mut rendered_path = None;
            match render_result {
                Ok(document) => match self.persist_rendered(&stage, &document.file_name, &document.bytes) {
                    Ok(path) => {
                        rendered_path = Some(path);
                        if let Some(url) = &self.config.webhook_url {
                            let summary = DeliverySummary {
                                cost_centre: stage.invoice.cost_centre.clone(),
                                total_amount: money_string(stage.invoice.totals.grand_total),
                                organization: stage.organization.clone(),
                                client_display_name: stage
                                    .client
                                    .as_ref()
                                    .map(|c| c.display_name.clone()),
                            };
                            if let Err(error) =
                                deliver(&self.http, url, &summary, std::slice::from_ref(&document))
                                    .await
                            {
                                warn!(cost_centre = %stage.invoice.cost_centre, error = %error, "delivery failed");
                                failures.push(BatchFailure {
                                    context: format!(
                                        "delivery for '{}'",
                                        stage.invoice.cost_centre
                                    ),
                                    error,
                                });
                            }
                        }
                    }
                    Err(error) => failures.push(BatchFailure {
                        context: format!("rendered output for '{}'", stage.invoice.cost_centre),
                        error,
                    }),
                },
                Err(error) => failures.push(BatchFailure {
                    context: format!("render for '{}'", stage.invoice.cost_centre),
                    error,
                }),
            }

            produced.push(ProducedInvoice {
                cost_centre: stage.invoice.cost_centre.clone(),
                label: stage.invoice.label.clone(),
                output_checkpoint: stage.output_checkpoint,
                invoice_checkpoint: stage.invoice_checkpoint,
                rendered_path,
                grand_total: money_string(stage.invoice.totals.grand_total),
            });
        }

        info!(
            correlation_id = %correlation_id,
            produced = produced.len(),
            failures = failures.len(),
            "invoice batch finished"
        );

        Ok(BatchReport {
            produced,
            failures,
            skipped_files,
            diagnostics: merge.diagnostics,
        })
    }

    fn persist_rendered(
        &self,
        stage: &StagedInvoice,
        file_name: &str,
        bytes: &[u8],
    ) -> EngineResult<PathBuf> {
        fs::create_dir_all(&self.config.rendered_dir).map_err(|e| EngineError::Io {
            path: self.config.rendered_dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = self.config.rendered_dir.join(file_name);
        fs::write(&path, bytes).map_err(|e| EngineError::Io {
            path: path.display().to_string(),
            message: format!("writing render for '{}': {e}", stage.invoice.cost_centre),
        })?;
        Ok(path)
    }
}

/// The payroll entity name used for registry and client lookups: the first
/// line's payroll name when the split column is on, otherwise the leading
/// dash-separated segment of the partition's first `Payroll Name Selection`
/// value.
fn payroll_entity_name(
    partition: &crate::models::CostCentrePartition,
    invoice: &Invoice,
) -> Option<String> {
    if let Some(name) = invoice.lines().find_map(|l| l.payroll_name.clone()) {
        return Some(name);
    }
    partition
        .table
        .get(0, PAYROLL_NAME_SELECTION)
        .map(|value| value.split('-').next().unwrap_or_default().to_string())
        .filter(|name| !name.is_empty())
}
