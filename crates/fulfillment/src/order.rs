//! Order data model consumed by the fulfillment pipeline.
//!
//! These types mirror what checkout hands over once payment has been
//! authorized. They are plain data: classification, splitting, and mapping
//! live in their own modules and never mutate an [`Order`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tgf_core::{Email, FflDealerId, OrderId, OrderItemId, Price, round_cents};

use crate::error::FulfillmentError;
use crate::order_number::OrderNumber;

/// A customer purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub customer: Customer,
    /// Line items in cart order.
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub billing_address: Address,
    #[serde(default)]
    pub ffl_dealer: Option<FflDealer>,
    pub payment: PaymentResult,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of `unit_price * quantity` over every line, rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `FulfillmentError::AmountOverflow` if a line or the sum does
    /// not fit in a `Decimal`.
    pub fn total(&self) -> Result<Decimal, FulfillmentError> {
        sum_extended(&self.items)
            .map(round_cents)
            .ok_or_else(|| FulfillmentError::AmountOverflow(self.order_number.to_string()))
    }
}

/// Unrounded sum of extended prices, or `None` on overflow.
pub(crate) fn sum_extended<'a>(
    items: impl IntoIterator<Item = &'a OrderItem>,
) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.extended_price()?))
}

/// The purchasing customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Set for business purchasers.
    #[serde(default)]
    pub company: Option<String>,
}

impl Customer {
    /// First and last name joined by a space, ignoring blank parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Company name, if one was given and is not blank.
    #[must_use]
    pub fn company_name(&self) -> Option<&str> {
        self.company
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub name: String,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// A licensed dealer receiving firearms for the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FflDealer {
    pub id: FflDealerId,
    pub business_name: String,
    pub license_number: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Payment outcome from the gateway. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub amount: Price,
    pub authorization_code: String,
    pub transaction_id: String,
    pub approved: bool,
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub name: String,
    /// Manufacturer part number.
    pub sku: String,
    /// Distributor's own stock number. Not interchangeable with `sku`.
    #[serde(default)]
    pub distributor_stock_number: String,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default, rename = "requiresFFL")]
    pub requires_ffl: bool,
    #[serde(default)]
    pub drop_ship_eligible: bool,
    #[serde(default)]
    pub in_house_only: bool,
    #[serde(default)]
    pub is_firearm: bool,
}

impl OrderItem {
    /// Unrounded `unit_price * quantity`, or `None` if it overflows.
    #[must_use]
    pub fn extended_price(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}
