//! TGF order number formatting.
//!
//! An order number is a zero-padded sequence, a receiver code, and a shipment
//! group suffix: `0001234FA` is sequence 1234, shipped to an FFL dealer, first
//! (or only) shipment group. A split order's second group is `0001234FB`.
//!
//! Sequences are allocated by an external counter. This module only formats
//! and validates them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tgf_core::ReceiverType;

use crate::classifier::classify;
use crate::error::FulfillmentError;
use crate::order::Order;

/// Number of digits the sequence is padded to.
pub const SEQUENCE_WIDTH: usize = 7;

/// Largest sequence that fits in [`SEQUENCE_WIDTH`] digits.
pub const MAX_SEQUENCE: i64 = 9_999_999;

/// Format the order number for the first shipment group.
///
/// ```
/// use tgf_core::ReceiverType;
/// use tgf_fulfillment::order_number::generate;
///
/// assert_eq!(generate(1234, ReceiverType::Ffl).unwrap(), "0001234FA");
/// assert!(generate(-1, ReceiverType::Ffl).is_err());
/// ```
///
/// # Errors
///
/// Returns `FulfillmentError::InvalidSequence` if the sequence is negative or
/// wider than [`SEQUENCE_WIDTH`] digits.
pub fn generate(sequence: i64, receiver: ReceiverType) -> Result<String, FulfillmentError> {
    OrderNumber::new(sequence, receiver)?.with_suffix(0)
}

/// Suffix letter for the shipment group at `index` (0 → `A`).
///
/// # Errors
///
/// Returns `FulfillmentError::InvalidSuffix` past `Z`.
pub fn suffix_letter(index: usize) -> Result<char, FulfillmentError> {
    u8::try_from(index)
        .ok()
        .filter(|offset| *offset < 26)
        .map(|offset| char::from(b'A' + offset))
        .ok_or(FulfillmentError::InvalidSuffix(index))
}

/// Receiver type encoded into an order's number.
///
/// Any line that requires FFL transfer makes the whole order an FFL order;
/// otherwise business purchasers are `Company` and everyone else
/// `Individual`.
#[must_use]
pub fn receiver_type_for(order: &Order) -> ReceiverType {
    if order.items.iter().any(|item| classify(item).requires_ffl) {
        ReceiverType::Ffl
    } else if order.customer.company_name().is_some() {
        ReceiverType::Company
    } else {
        ReceiverType::Individual
    }
}

/// Order number without its shipment group suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber {
    sequence: u32,
    receiver: ReceiverType,
}

impl OrderNumber {
    /// Validate a sequence and pair it with a receiver type.
    ///
    /// # Errors
    ///
    /// Returns `FulfillmentError::InvalidSequence` if the sequence is out of
    /// range.
    pub fn new(sequence: i64, receiver: ReceiverType) -> Result<Self, FulfillmentError> {
        let invalid = FulfillmentError::InvalidSequence {
            sequence,
            max: MAX_SEQUENCE,
        };
        if sequence > MAX_SEQUENCE {
            return Err(invalid);
        }
        let sequence = u32::try_from(sequence).map_err(|_| invalid)?;
        Ok(Self { sequence, receiver })
    }

    /// The numeric sequence, without padding.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Who receives the order's shipments.
    #[must_use]
    pub const fn receiver(&self) -> ReceiverType {
        self.receiver
    }

    /// Full order number for the shipment group at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FulfillmentError::InvalidSuffix` past `Z`.
    pub fn with_suffix(&self, index: usize) -> Result<String, FulfillmentError> {
        Ok(format!("{self}{}", suffix_letter(index)?))
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0width$}{}",
            self.sequence,
            self.receiver.code(),
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for OrderNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let code = chars
            .next_back()
            .ok_or_else(|| "order number cannot be empty".to_string())?;
        let digits = chars.as_str();

        let receiver = ReceiverType::from_code(code)
            .ok_or_else(|| format!("invalid receiver code '{code}' in order number {s}"))?;
        if digits.len() != SEQUENCE_WIDTH || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!(
                "order number {s} must start with {SEQUENCE_WIDTH} digits"
            ));
        }
        let sequence = digits.parse::<i64>().map_err(|e| e.to_string())?;

        Self::new(sequence, receiver).map_err(|e| e.to_string())
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.to_string()
    }
}
