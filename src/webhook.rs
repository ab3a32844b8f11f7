//! Fire-and-forget delivery of rendered invoices.
//!
//! Each cost centre's delivery is a multipart POST: a JSON summary part
//! plus one binary part per rendered document. Failures are reported as
//! [`EngineError::WebhookDelivery`] and never retried; a failed delivery
//! does not roll back checkpoints or rendered files.

use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::OrganizationMatch;
use crate::render::RenderedDocument;

/// The JSON summary part of one delivery.
#[derive(Debug, Clone, Serialize)]
pub struct DeliverySummary {
    /// The cost centre this delivery covers.
    pub cost_centre: String,
    /// Grand total for the invoice, 2-decimal string.
    pub total_amount: String,
    /// Matched organization metadata, if enrichment succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationMatch>,
    /// Client display name, if the client lookup resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_display_name: Option<String>,
}

/// Posts one delivery to the webhook endpoint.
///
/// The summary travels as a `summary` JSON part; each document as a binary
/// part named `document`, keeping its suggested file name.
pub async fn deliver(
    client: &reqwest::Client,
    url: &str,
    summary: &DeliverySummary,
    documents: &[RenderedDocument],
) -> EngineResult<()> {
    let summary_json =
        serde_json::to_string(summary).map_err(|e| EngineError::WebhookDelivery {
            url: url.to_string(),
            message: format!("could not encode summary: {e}"),
        })?;

    let mut form = reqwest::multipart::Form::new().text("summary", summary_json);
    for document in documents {
        form = form.part(
            "document",
            reqwest::multipart::Part::bytes(document.bytes.clone())
                .file_name(document.file_name.clone()),
        );
    }

    let response = client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| EngineError::WebhookDelivery {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(EngineError::WebhookDelivery {
            url: url.to_string(),
            message: format!("endpoint returned {}", response.status()),
        });
    }
    Ok(())
}
