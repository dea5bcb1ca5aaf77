//! Per-item fulfillment classification.
//!
//! Centralizes two business rules so every caller applies them the same way:
//! a firearm always requires FFL transfer, whatever the catalog flag says,
//! and an in-house-only item is never drop-shipped.

use serde::{Deserialize, Serialize};

use crate::order::OrderItem;

/// The two independent fulfillment axes of a line item.
///
/// `requires_ffl` and `drop_ship_eligible` are not mutually exclusive: a
/// firearm that is drop-ship eligible ships from the distributor straight to
/// the FFL dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    #[serde(rename = "requiresFFL")]
    pub requires_ffl: bool,
    pub drop_ship_eligible: bool,
}

/// Classify an order item.
#[must_use]
pub const fn classify(item: &OrderItem) -> Classification {
    Classification {
        requires_ffl: item.requires_ffl || item.is_firearm,
        drop_ship_eligible: item.drop_ship_eligible && !item.in_house_only,
    }
}

/// An order item paired with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedItem {
    pub item: OrderItem,
    pub classification: Classification,
}

impl ClassifiedItem {
    #[must_use]
    pub fn new(item: &OrderItem) -> Self {
        Self {
            classification: classify(item),
            item: item.clone(),
        }
    }
}
