//! Status and classification enums shared across the fulfillment pipeline.
//!
//! Each enum serializes to the exact picklist label the CRM expects, so a
//! misspelled value is a compile error instead of a silently empty field.

use serde::{Deserialize, Serialize};

/// How a shipment group is fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FulfillmentType {
    /// Retailer receives the stock and ships or hands it off itself.
    #[serde(rename = "In-House")]
    InHouse,
    /// Distributor ships straight to the customer or FFL dealer.
    #[serde(rename = "Drop-Ship")]
    DropShip,
}

impl FulfillmentType {
    /// CRM picklist label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InHouse => "In-House",
            Self::DropShip => "Drop-Ship",
        }
    }
}

impl std::fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Who receives a shipment group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsigneeType {
    /// The purchasing customer.
    Customer,
    /// A licensed FFL dealer receiving on the customer's behalf.
    #[serde(rename = "FFL")]
    FflDealer,
    /// The retailer itself.
    #[serde(rename = "TGF")]
    Tgf,
}

impl ConsigneeType {
    /// CRM picklist label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::FflDealer => "FFL",
            Self::Tgf => "TGF",
        }
    }
}

impl std::fmt::Display for ConsigneeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Receiver type encoded into the order number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverType {
    Individual,
    Company,
    Ffl,
}

impl ReceiverType {
    /// One-letter code used inside order numbers.
    #[must_use]
    pub const fn code(&self) -> char {
        match self {
            Self::Individual => 'I',
            Self::Company => 'C',
            Self::Ffl => 'F',
        }
    }

    /// Parse the one-letter order number code.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'I' => Some(Self::Individual),
            'C' => Some(Self::Company),
            'F' => Some(Self::Ffl),
            _ => None,
        }
    }
}

impl std::str::FromStr for ReceiverType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "individual" | "i" => Ok(Self::Individual),
            "company" | "c" => Ok(Self::Company),
            "ffl" | "f" => Ok(Self::Ffl),
            _ => Err(format!("invalid receiver type: {s}")),
        }
    }
}

/// Deal order status.
///
/// Maps to the CRM's `Order_Status` picklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Submitted,
    Hold,
    Confirmed,
    Processing,
    #[serde(rename = "Partially Shipped")]
    PartiallyShipped,
    Shipped,
    Delivered,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    /// CRM picklist label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Hold => "Hold",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::PartiallyShipped => "Partially Shipped",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reason category for a compliance hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldType {
    /// The order needs an FFL dealer and none is on file.
    #[serde(rename = "FFL not on file")]
    FflNotOnFile,
    /// The customer exceeded a firearm purchase count limit.
    #[serde(rename = "Gun Count Rule")]
    GunCountRule,
}

impl HoldType {
    /// CRM picklist label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FflNotOnFile => "FFL not on file",
            Self::GunCountRule => "Gun Count Rule",
        }
    }
}

/// Direction of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Flow {
    #[default]
    Outbound,
    Return,
}

/// Progress of a customer return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnStatus {
    #[serde(rename = "Shipped to TGF")]
    ShippedToTgf,
    #[serde(rename = "Shipped to Dist")]
    ShippedToDistributor,
    #[serde(rename = "Item Received IH")]
    ItemReceivedInHouse,
    Reshipped,
    Refunded,
    Closed,
}
