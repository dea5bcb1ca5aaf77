//! Order splitting into shipment groups.
//!
//! Every drop-ship eligible line (firearm or not) goes into one `DropShip`
//! group; everything else goes into one `InHouse` group. Groups appear in the
//! order their fulfillment type first shows up in the cart, and take suffixes
//! `A`, `B` in that order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tgf_core::{ConsigneeType, FulfillmentType, round_cents};
use tracing::debug;

use crate::classifier::ClassifiedItem;
use crate::config::Environment;
use crate::error::FulfillmentError;
use crate::order::{Order, sum_extended};
use crate::order_number::suffix_letter;

/// A subset of an order's items fulfilled together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentGroup {
    pub fulfillment_type: FulfillmentType,
    pub consignee_type: ConsigneeType,
    pub ordering_account: String,
    /// Never empty. Items keep their cart order.
    pub items: Vec<ClassifiedItem>,
    pub suffix: char,
    /// Sum of the items' extended prices, rounded to cents.
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}

impl ShipmentGroup {
    /// Whether any line in the group must be transferred through an FFL.
    #[must_use]
    pub fn requires_ffl(&self) -> bool {
        self.items
            .iter()
            .any(|line| line.classification.requires_ffl)
    }

    /// Group amount, rounded to cents.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Position of the group within its order (`A` → 0).
    #[must_use]
    pub fn index(&self) -> usize {
        u32::from(self.suffix).saturating_sub(u32::from('A')) as usize
    }
}

/// Split an order into at most two shipment groups.
///
/// # Errors
///
/// Returns `FulfillmentError::EmptyOrder` if the order has no items. Callers
/// are expected to reject empty carts before checkout; this is the backstop.
/// Returns `FulfillmentError::AmountOverflow` if a group total does not fit
/// in a `Decimal`.
pub fn split(order: &Order, env: &Environment) -> Result<Vec<ShipmentGroup>, FulfillmentError> {
    if order.items.is_empty() {
        return Err(FulfillmentError::EmptyOrder(order.order_number.to_string()));
    }

    // (fulfillment type, lines) in creation order
    let mut buckets: Vec<(FulfillmentType, Vec<ClassifiedItem>)> = Vec::with_capacity(2);
    for item in &order.items {
        let line = ClassifiedItem::new(item);
        let fulfillment = if line.classification.drop_ship_eligible {
            FulfillmentType::DropShip
        } else {
            FulfillmentType::InHouse
        };

        match buckets.iter_mut().find(|(kind, _)| *kind == fulfillment) {
            Some((_, lines)) => lines.push(line),
            None => buckets.push((fulfillment, vec![line])),
        }
    }

    let groups = buckets
        .into_iter()
        .enumerate()
        .map(|(index, (fulfillment_type, items))| {
            let consignee_type = if items.iter().any(|line| line.classification.requires_ffl) {
                ConsigneeType::FflDealer
            } else {
                ConsigneeType::Customer
            };

            let amount = sum_extended(items.iter().map(|line| &line.item))
                .map(round_cents)
                .ok_or_else(|| FulfillmentError::AmountOverflow(order.order_number.to_string()))?;

            Ok(ShipmentGroup {
                fulfillment_type,
                consignee_type,
                ordering_account: env.ordering_account(fulfillment_type).to_string(),
                items,
                suffix: suffix_letter(index)?,
                amount,
            })
        })
        .collect::<Result<Vec<_>, FulfillmentError>>()?;

    debug!(
        order_number = %order.order_number,
        groups = groups.len(),
        items = order.items.len(),
        "Split order into shipment groups"
    );

    Ok(groups)
}
