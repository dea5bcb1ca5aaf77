//! CRM deal records.
//!
//! One [`DealRecord`] is rendered per shipment group by [`map_to_deal`]. It
//! is created once at submission time and afterwards only patched, never
//! rebuilt, by the reconciler.
//!
//! # Modules
//!
//! - `fields` - The fixed deal field set and subform row
//! - `mapper` - Order + shipment group → deal projection
//! - `zoho_time` - CRM datetime serialization

mod fields;
mod mapper;
pub mod zoho_time;

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tgf_core::{HoldType, OrderStatus};

use crate::config::DealDefaults;

pub use fields::{CrmLookup, DealFields, DealLineItem};
pub use mapper::{ShippingOutcome, map_to_deal};

/// Maximum length the CRM accepts for short text fields.
pub const MAX_TEXT_LENGTH: usize = 100;

/// The CRM-facing projection of one shipment group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    /// Order number including the group suffix.
    pub order_number: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub fields: DealFields,
    pub line_items: Vec<DealLineItem>,
}

/// Request body for a deal upsert: top-level fields plus the product subform.
#[derive(Debug, Serialize)]
pub struct CrmDealPayload<'a> {
    #[serde(flatten)]
    pub fields: &'a DealFields,
    #[serde(rename = "Subform_1")]
    pub line_items: &'a [DealLineItem],
}

impl DealRecord {
    /// Borrow the record as a CRM upsert body.
    #[must_use]
    pub fn payload(&self) -> CrmDealPayload<'_> {
        CrmDealPayload {
            fields: &self.fields,
            line_items: &self.line_items,
        }
    }

    /// Whether the deal is currently on a compliance hold.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.fields.hold_type.is_some()
    }

    /// Whether the distributor has already accepted this deal.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.fields.order_status, OrderStatus::Confirmed)
            || self.fields.distributor_order_number.is_some()
    }

    /// Check the record against the CRM's field constraints.
    ///
    /// Returns every violation found; an empty vector means the record is
    /// acceptable.
    #[must_use]
    pub fn validate(&self) -> Vec<DealValidationError> {
        let mut errors = Vec::new();

        if self.fields.deal_name.trim().is_empty() {
            errors.push(DealValidationError::MissingDealName);
        }
        if self.fields.deal_name.chars().count() > MAX_TEXT_LENGTH {
            errors.push(DealValidationError::TooLong("Deal_Name".to_string()));
        }
        if self.amount <= Decimal::ZERO {
            errors.push(DealValidationError::NonPositiveAmount(self.amount));
        }

        for (row, line) in self.line_items.iter().enumerate() {
            if line.quantity == 0 {
                errors.push(DealValidationError::ZeroQuantity { row });
            }
            if line.unit_price < Decimal::ZERO {
                errors.push(DealValidationError::NegativeUnitPrice { row });
            }
            if line.product_code.chars().count() > MAX_TEXT_LENGTH {
                errors.push(DealValidationError::TooLong(format!(
                    "Subform_1[{row}].Product_Code"
                )));
            }
            if line
                .manufacturer
                .as_ref()
                .is_some_and(|m| m.chars().count() > MAX_TEXT_LENGTH)
            {
                errors.push(DealValidationError::TooLong(format!(
                    "Subform_1[{row}].Manufacturer"
                )));
            }
        }

        errors
    }
}

/// A CRM field constraint violated by a deal record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealValidationError {
    #[error("Deal_Name is required")]
    MissingDealName,
    #[error("Amount must be greater than 0 (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("Quantity must be a positive integer (row {row})")]
    ZeroQuantity { row: usize },
    #[error("Unit_Price cannot be negative (row {row})")]
    NegativeUnitPrice { row: usize },
    #[error("{0} exceeds {MAX_TEXT_LENGTH} character limit")]
    TooLong(String),
}

/// A hold decided by an external compliance rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldDecision {
    pub hold_type: HoldType,
    pub reason: String,
}

impl HoldDecision {
    /// Hold applied when a group needs an FFL dealer and the order has none.
    #[must_use]
    pub fn ffl_not_on_file() -> Self {
        Self {
            hold_type: HoldType::FflNotOnFile,
            reason: "FFL dealer not found on order - awaiting dealer selection".to_string(),
        }
    }
}

/// CRM record ids resolved before the deal is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmReferences {
    #[serde(default)]
    pub contact_id: Option<String>,
    /// Product record ids keyed by SKU.
    #[serde(default)]
    pub product_ids: BTreeMap<String, String>,
}

/// Everything the mapper needs besides the order and group.
///
/// The submission time is an explicit input, so mapping the same order twice
/// produces identical records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealContext {
    pub submitted_at: DateTime<Utc>,
    pub hold: Option<HoldDecision>,
    pub references: CrmReferences,
    pub defaults: DealDefaults,
}

impl DealContext {
    /// Build a context for deals submitted at `submitted_at`.
    ///
    /// The time is truncated to whole seconds, the precision the CRM stores.
    #[must_use]
    pub fn new(submitted_at: DateTime<Utc>, defaults: DealDefaults) -> Self {
        Self {
            submitted_at: submitted_at.trunc_subsecs(0),
            hold: None,
            references: CrmReferences::default(),
            defaults,
        }
    }

    #[must_use]
    pub fn with_hold(mut self, hold: HoldDecision) -> Self {
        self.hold = Some(hold);
        self
    }

    #[must_use]
    pub fn with_references(mut self, references: CrmReferences) -> Self {
        self.references = references;
        self
    }
}
