//! TGF Core - Shared domain types.
//!
//! This crate provides the types shared by every TGF fulfillment component:
//! - `tgf-fulfillment` - Order classification, splitting, and CRM deal mapping
//! - `tgf-cli` - Command-line tools over the fulfillment library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no CRM or distributor clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
