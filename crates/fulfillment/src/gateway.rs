//! External collaborators: the CRM and the distributor's order engine.
//!
//! Only the capabilities the pipeline relies on are modelled here. Concrete
//! HTTP clients live outside this crate.

use std::future::Future;

use crate::deal::DealRecord;
use crate::distributor::DistributorOrder;
use crate::error::GatewayError;
use crate::order::{Customer, OrderItem};
use crate::reconciler::DistributorResponse;

/// A deal as held by the CRM after an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDeal {
    /// CRM record id.
    pub id: String,
    /// The stored record. For a deal that already existed this is the
    /// existing version, not the one passed to the upsert.
    pub deal: DealRecord,
}

/// CRM record store.
///
/// Every `upsert_*` is an idempotent find-or-create keyed on the record's
/// natural key (contact email, product SKU, deal order number). It returns
/// the existing record if one exists, otherwise creates the record and
/// returns the new one. Implementations must not create duplicates when
/// called concurrently for the same key; callers treat each upsert as a
/// single atomic operation.
pub trait CrmGateway {
    /// Find or create the contact for a customer, keyed on email.
    fn upsert_contact(
        &self,
        customer: &Customer,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// Find or create a product, keyed on SKU.
    fn upsert_product(
        &self,
        item: &OrderItem,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// Find or create a deal, keyed on its suffixed order number.
    fn upsert_deal(
        &self,
        deal: &DealRecord,
    ) -> impl Future<Output = Result<StoredDeal, GatewayError>> + Send;

    /// Overwrite the fields of an existing deal.
    fn patch_deal(
        &self,
        deal_id: &str,
        deal: &DealRecord,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// Distributor order engine.
pub trait DistributorGateway {
    /// Submit one drop-ship group.
    ///
    /// A rejection by the distributor is a successful call returning a
    /// non-`00` response; `Err` means no usable response came back.
    fn submit(
        &self,
        order: &DistributorOrder,
    ) -> impl Future<Output = Result<DistributorResponse, GatewayError>> + Send;
}
