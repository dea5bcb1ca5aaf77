//! Distributor response reconciliation.
//!
//! Turns the order engine's reply to a submission into a patch of the
//! existing deal. The deal is never rebuilt: only distributor-owned fields
//! change, everything else is carried over as-is.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tgf_core::OrderStatus;
use tracing::{info, warn};

use crate::deal::DealRecord;

/// Status code the order engine returns for an accepted order.
pub const SUCCESS_STATUS_CODE: &str = "00";

/// A distributor's reply to an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorResponse {
    /// `00` on success. Anything else, including an empty code, is a failure.
    pub status_code: String,
    #[serde(default)]
    pub status_message: Option<String>,
    /// The distributor's own order number.
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub estimated_ship_date: Option<NaiveDate>,
    pub received_at: DateTime<Utc>,
    /// Response body exactly as received.
    pub raw: String,
}

/// The engine's JSON body, in its own field names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EngineResult {
    status_code: String,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    order_number: Option<String>,
    #[serde(default)]
    tracking_number: Option<String>,
    #[serde(default, alias = "ShipVia")]
    carrier: Option<String>,
    #[serde(default, alias = "ShipDate")]
    estimated_ship_date: Option<String>,
}

impl DistributorResponse {
    /// Parse a raw engine body.
    ///
    /// Accepts the result object either bare or wrapped as `{"result": {...}}`.
    /// A body that cannot be parsed becomes a failure response carrying the
    /// raw text, so reconciliation can still record it.
    ///
    /// `received_at` is truncated to whole seconds.
    #[must_use]
    pub fn from_raw(raw: &str, received_at: DateTime<Utc>) -> Self {
        let received_at = received_at.trunc_subsecs(0);
        let parsed = serde_json::from_str::<Value>(raw).ok().and_then(|body| {
            let inner = match body {
                Value::Object(mut map) if map.get("result").is_some_and(Value::is_object) => {
                    map.remove("result").unwrap_or_default()
                }
                other => other,
            };
            serde_json::from_value::<EngineResult>(inner).ok()
        });

        match parsed {
            Some(result) => Self {
                status_code: result.status_code.trim().to_string(),
                status_message: non_blank(result.status_message),
                order_number: non_blank(result.order_number),
                tracking_number: non_blank(result.tracking_number),
                carrier: non_blank(result.carrier),
                estimated_ship_date: result.estimated_ship_date.as_deref().and_then(parse_date),
                received_at,
                raw: raw.to_string(),
            },
            None => {
                warn!(body_len = raw.len(), "Unparseable distributor response");
                Self {
                    status_code: String::new(),
                    status_message: Some("Malformed distributor response".to_string()),
                    order_number: None,
                    tracking_number: None,
                    carrier: None,
                    estimated_ship_date: None,
                    received_at,
                    raw: raw.to_string(),
                }
            }
        }
    }

    /// Whether the distributor accepted the order.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == SUCCESS_STATUS_CODE
    }

    /// Status message, or a generic one when the engine sent none.
    #[must_use]
    pub fn message(&self) -> &str {
        match self.status_message.as_deref() {
            Some(message) => message,
            None if self.is_success() => "Success",
            None => "Unknown error",
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `yyyy-MM-dd`, optionally followed by a time part.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Apply a distributor response to a deal.
///
/// Returns a patched copy; `deal` itself is left untouched. With no response
/// the copy is identical to the input. A failure never changes the order
/// status or an existing hold: it only records what the distributor said.
#[must_use]
pub fn apply_response(deal: &DealRecord, response: Option<&DistributorResponse>) -> DealRecord {
    let mut patched = deal.clone();
    let Some(response) = response else {
        return patched;
    };

    let fields = &mut patched.fields;
    fields.app_response = Some(response.raw.clone());
    fields.last_distributor_update = Some(response.received_at);

    if response.is_success() {
        fields.order_status = OrderStatus::Confirmed;
        fields.app_status = format!("Confirmed: {}", response.message());
        fields.app_confirmed = Some(response.received_at);

        if let Some(number) = &response.order_number {
            fields.distributor_order_number = Some(number.clone());
        }
        if let Some(tracking) = &response.tracking_number {
            fields.tracking_number = Some(tracking.clone());
        }
        if let Some(carrier) = &response.carrier {
            fields.carrier = Some(carrier.clone());
        }
        if response.estimated_ship_date.is_some() {
            fields.estimated_ship_date = response.estimated_ship_date;
        }

        let released = fields.hold_type.take();
        fields.hold_reason = None;
        if released.is_some() {
            fields.hold_cleared_at = Some(response.received_at);
        }

        info!(
            order_number = %deal.order_number,
            distributor_order = ?response.order_number,
            hold_released = released.is_some(),
            "Distributor confirmed order"
        );
    } else {
        fields.app_status = format!("Rejected: {}", response.message());

        warn!(
            order_number = %deal.order_number,
            status_code = %response.status_code,
            message = response.message(),
            "Distributor rejected order"
        );
    }

    patched
}
