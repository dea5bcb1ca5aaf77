//! Error types for the fulfillment pipeline.

use thiserror::Error;

/// Errors raised by the pure fulfillment components.
///
/// None of these are retryable: they describe malformed input, not a
/// transient failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FulfillmentError {
    /// Order sequence number is negative or does not fit the fixed width.
    #[error("Invalid order sequence {sequence}: must be between 0 and {max}")]
    InvalidSequence {
        /// The rejected sequence number.
        sequence: i64,
        /// Largest sequence the order number format can hold.
        max: i64,
    },

    /// Shipment group index has no suffix letter.
    #[error("Invalid shipment group index {0}: suffixes run from A to Z")]
    InvalidSuffix(usize),

    /// Order reached the splitter without any line items.
    #[error("Order {0} has no items")]
    EmptyOrder(String),

    /// A line or group total does not fit in a `Decimal`.
    #[error("Order {0} has an amount outside the supported range")]
    AmountOverflow(String),
}

/// Errors reported by external collaborators (CRM, distributor).
///
/// The processor records these per shipment group; it never lets one
/// group's failure abort another group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The remote service could not be reached.
    #[error("{service} unavailable: {message}")]
    Unavailable {
        /// Name of the collaborator (e.g. "crm", "distributor").
        service: &'static str,
        /// Transport-level detail.
        message: String,
    },

    /// The remote service rejected the request.
    #[error("{service} rejected request: {message}")]
    Rejected {
        /// Name of the collaborator.
        service: &'static str,
        /// Rejection detail as returned by the service.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}
