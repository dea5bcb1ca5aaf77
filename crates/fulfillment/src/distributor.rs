//! Distributor order payloads.

use serde::{Deserialize, Serialize};
use tgf_core::FulfillmentType;

use crate::splitter::ShipmentGroup;

/// An order as submitted to the distributor's order engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorOrder {
    /// Ordering account the group was assigned.
    pub account: String,
    /// Our order number, suffix included.
    pub po_number: String,
    pub items: Vec<DistributorLine>,
}

/// One line of a distributor order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorLine {
    /// Manufacturer part number (the item's SKU).
    pub part_number: String,
    pub quantity: u32,
}

impl DistributorOrder {
    /// Build the submission for a drop-ship group.
    ///
    /// Returns `None` for in-house groups, which are received into our own
    /// stock and never submitted.
    #[must_use]
    pub fn for_group(group: &ShipmentGroup, order_number: &str) -> Option<Self> {
        if group.fulfillment_type != FulfillmentType::DropShip {
            return None;
        }

        Some(Self {
            account: group.ordering_account.clone(),
            po_number: order_number.to_string(),
            items: group
                .items
                .iter()
                .map(|line| DistributorLine {
                    part_number: line.item.sku.clone(),
                    quantity: line.item.quantity,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::config::Environment;
    use crate::splitter::split;
    use crate::test_support::{accessory, firearm, sample_order};

    #[test]
    fn test_drop_ship_group_payload() {
        let order = sample_order(vec![accessory(7, Decimal::new(1_495, 2), 3)], false);
        let groups = split(&order, &Environment::production()).unwrap();
        let submission = DistributorOrder::for_group(&groups[0], "0001234IA").unwrap();

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "account": "63824",
                "poNumber": "0001234IA",
                "items": [{"partNumber": "SKU-7", "quantity": 3}]
            })
        );
    }

    #[test]
    fn test_in_house_group_is_not_submitted() {
        let order = sample_order(vec![firearm(1, Decimal::new(54_999, 2), false)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        assert_eq!(groups[0].fulfillment_type, FulfillmentType::InHouse);
        assert!(DistributorOrder::for_group(&groups[0], "0001234FA").is_none());
    }
}
