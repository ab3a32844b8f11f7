//! The document-rendering boundary.
//!
//! Template and layout concerns live outside the core: the engine hands a
//! [`RenderJob`] (invoice rows with separators, totals, optional enrichment
//! records) to a [`DocumentRenderer`] and does not inspect the bytes that
//! come back. A [`PlainTextRenderer`] ships as a stand-in so batches run
//! end to end without a PDF toolchain.
//!
//! Rendering is the one stage that fans out: partitions share no mutable
//! state, so invoices render concurrently under a bounded worker count.

mod plain;

pub use plain::PlainTextRenderer;

use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::error::{EngineError, EngineResult};
use crate::models::{ClientRecord, Invoice, OrganizationMatch};

/// Everything a renderer needs for one invoice document.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// The assembled invoice, separators included.
    pub invoice: Invoice,
    /// Optional organization registry match for header metadata.
    pub organization: Option<OrganizationMatch>,
    /// Optional client/project lookup record.
    pub client: Option<ClientRecord>,
}

/// A rendered document, opaque to the core.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Suggested file name, extension chosen by the renderer.
    pub file_name: String,
    /// The rendered bytes.
    pub bytes: Vec<u8>,
}

/// Renders one invoice into a paginated document.
pub trait DocumentRenderer: Send + Sync {
    /// Produces the rendered document for one invoice.
    fn render(&self, job: &RenderJob) -> EngineResult<RenderedDocument>;
}

/// Renders all jobs with at most `workers` running concurrently.
///
/// Results come back in job order. A panicking or failing render only
/// affects its own invoice; the others complete normally.
pub async fn render_all(
    renderer: Arc<dyn DocumentRenderer>,
    jobs: Vec<RenderJob>,
    workers: usize,
) -> Vec<EngineResult<RenderedDocument>> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles = Vec::with_capacity(jobs.len());

    for job in jobs {
        let renderer = Arc::clone(&renderer);
        let semaphore = Arc::clone(&semaphore);
        let cost_centre = job.invoice.cost_centre.clone();
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|_| {
                EngineError::Render {
                    cost_centre: cost_centre.clone(),
                    message: "render pool closed".to_string(),
                }
            })?;
            let inner_cost_centre = cost_centre.clone();
            tokio::task::spawn_blocking(move || renderer.render(&job))
                .await
                .unwrap_or_else(|e| {
                    Err(EngineError::Render {
                        cost_centre: inner_cost_centre,
                        message: e.to_string(),
                    })
                })
        });
        handles.push(handle);
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap_or_else(|e| {
            Err(EngineError::Render {
                cost_centre: String::new(),
                message: e.to_string(),
            })
        }));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceTotals, round2};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRenderer {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl DocumentRenderer for CountingRenderer {
        fn render(&self, job: &RenderJob) -> EngineResult<RenderedDocument> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(RenderedDocument {
                file_name: format!("{}_invoice.txt", job.invoice.label),
                bytes: Vec::new(),
            })
        }
    }

    fn job(label: &str) -> RenderJob {
        RenderJob {
            invoice: Invoice {
                cost_centre: label.replace('_', " "),
                label: label.to_string(),
                rows: Vec::new(),
                totals: InvoiceTotals {
                    subtotal: round2(Decimal::ZERO),
                    gst: round2(Decimal::ZERO),
                    grand_total: round2(Decimal::ZERO),
                },
            },
            organization: None,
            client: None,
        }
    }

    #[tokio::test]
    async fn test_render_all_respects_worker_bound() {
        let renderer = Arc::new(CountingRenderer {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let jobs = (0..6).map(|i| job(&format!("CC_{i}"))).collect();
        let results = render_all(Arc::clone(&renderer) as Arc<dyn DocumentRenderer>, jobs, 2).await;

        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|r| r.is_ok()));
        assert!(renderer.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_results_preserve_job_order() {
        let renderer = Arc::new(CountingRenderer {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let jobs = vec![job("First"), job("Second")];
        let results = render_all(renderer, jobs, 4).await;
        assert_eq!(results[0].as_ref().unwrap().file_name, "First_invoice.txt");
        assert_eq!(results[1].as_ref().unwrap().file_name, "Second_invoice.txt");
    }

    struct FailingRenderer;

    impl DocumentRenderer for FailingRenderer {
        fn render(&self, job: &RenderJob) -> EngineResult<RenderedDocument> {
            Err(EngineError::Render {
                cost_centre: job.invoice.cost_centre.clone(),
                message: "template missing".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_failed_render_is_isolated_to_its_result() {
        let results = render_all(Arc::new(FailingRenderer), vec![job("Ops_A")], 1).await;
        assert!(matches!(
            results[0],
            Err(EngineError::Render { .. })
        ));
    }
}
