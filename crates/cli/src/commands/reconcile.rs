//! Distributor response reconciliation.

use std::path::Path;

use chrono::{DateTime, Utc};
use tgf_fulfillment::{DealRecord, DistributorResponse, apply_response};
use tracing::info;

use super::{InputError, load_document, write_json};

/// Print the deal after applying a raw distributor response to it.
///
/// # Errors
///
/// Returns an error if either file cannot be read or the deal is malformed.
/// A malformed response body is not an error; it is recorded as a failure.
pub async fn reconcile(
    deal_path: &Path,
    response_path: Option<&Path>,
    received_at: DateTime<Utc>,
) -> Result<(), Box<dyn std::error::Error>> {
    let deal: DealRecord = load_document(deal_path).await?;

    let response = match response_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| InputError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
            Some(DistributorResponse::from_raw(&raw, received_at))
        }
        None => None,
    };

    let patched = apply_response(&deal, response.as_ref());
    info!(
        order_number = %patched.order_number,
        status = %patched.fields.order_status,
        app_status = %patched.fields.app_status,
        "Deal reconciled"
    );

    write_json(&patched)
}
