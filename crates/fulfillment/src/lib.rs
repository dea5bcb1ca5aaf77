//! TGF Fulfillment - Order splitting and CRM deal mapping.
//!
//! Takes a paid order and turns it into what the back office works with:
//! one or two shipment groups, one CRM deal per group, and a distributor
//! submission per drop-ship group.
//!
//! # Pipeline
//!
//! 1. [`order_number`] - Formats `0001234FA`-style order numbers
//! 2. [`classifier`] - Derives FFL and drop-ship flags per item
//! 3. [`splitter`] - Partitions the cart into shipment groups
//! 4. [`deal`] - Renders each group as a CRM deal
//! 5. [`reconciler`] - Patches a deal with the distributor's answer
//!
//! The five steps are pure. [`processor`] runs them against the
//! collaborators declared in [`gateway`].
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use tgf_fulfillment::config::{DealDefaults, Environment};
//! use tgf_fulfillment::deal::{DealContext, map_to_deal};
//! use tgf_fulfillment::order::Order;
//! use tgf_fulfillment::splitter::split;
//!
//! fn deals(order: &Order) -> Result<(), tgf_fulfillment::FulfillmentError> {
//!     let ctx = DealContext::new(Utc::now(), DealDefaults::default());
//!     for group in split(order, &Environment::test())? {
//!         let deal = map_to_deal(order, &group, &ctx);
//!         assert!(deal.order_number.starts_with(&order.order_number.to_string()));
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod classifier;
pub mod config;
pub mod deal;
pub mod distributor;
pub mod error;
pub mod gateway;
pub mod order;
pub mod order_number;
pub mod processor;
pub mod reconciler;
pub mod splitter;

#[cfg(test)]
mod test_support;

pub use classifier::{Classification, ClassifiedItem, classify};
pub use config::{ConfigError, DealDefaults, Environment, EnvironmentMode, FulfillmentConfig};
pub use deal::{DealContext, DealRecord, HoldDecision, map_to_deal};
pub use distributor::DistributorOrder;
pub use error::{FulfillmentError, GatewayError};
pub use gateway::{CrmGateway, DistributorGateway, StoredDeal};
pub use order::{Order, OrderItem};
pub use order_number::{OrderNumber, generate};
pub use processor::{OrderOutcome, OrderProcessor, ProcessedDeal, SubmissionOutcome};
pub use reconciler::{DistributorResponse, apply_response};
pub use splitter::{ShipmentGroup, split};
