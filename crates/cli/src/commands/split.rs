//! Order splitting and deal rendering.

use std::path::Path;

use chrono::{DateTime, Utc};
use tgf_fulfillment::{
    DealContext, DealRecord, FulfillmentConfig, HoldDecision, Order, map_to_deal, split,
};
use tracing::{info, warn};

use super::{load_document, write_json};

/// Print the shipment groups of an order.
///
/// # Errors
///
/// Returns an error if configuration or the order file is invalid, or the
/// order has no items.
pub async fn split_order(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = FulfillmentConfig::from_env()?;
    let order: Order = load_document(path).await?;

    let groups = split(&order, &config.environment)?;
    info!(
        order_number = %order.order_number,
        groups = groups.len(),
        environment = ?config.environment.mode,
        "Order split"
    );

    write_json(&groups)
}

/// Print one CRM deal per shipment group.
///
/// Validation problems are logged but do not stop the output, so the
/// rendered deal can be inspected.
///
/// # Errors
///
/// Returns an error if configuration or the order file is invalid, or the
/// order has no items.
pub async fn render_deals(
    path: &Path,
    submitted_at: DateTime<Utc>,
    hold: Option<&HoldDecision>,
    payload: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = FulfillmentConfig::from_env()?;
    let order: Order = load_document(path).await?;
    let groups = split(&order, &config.environment)?;

    let deals: Vec<DealRecord> = groups
        .iter()
        .map(|group| {
            let mut ctx = DealContext::new(submitted_at, config.deal_defaults.clone());
            if let Some(hold) = hold.filter(|_| group.requires_ffl()) {
                ctx = ctx.with_hold(hold.clone());
            }
            map_to_deal(&order, group, &ctx)
        })
        .collect();

    for deal in &deals {
        for error in deal.validate() {
            warn!(order_number = %deal.order_number, "{error}");
        }
    }

    if payload {
        let payloads: Vec<_> = deals.iter().map(DealRecord::payload).collect();
        write_json(&payloads)
    } else {
        write_json(&deals)
    }
}
