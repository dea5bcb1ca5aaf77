//! Integration tests for TGF order fulfillment.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tgf-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `split_scenarios` - Cart shapes and the shipment groups they produce
//! - `reconciliation` - Distributor responses applied to deals
//! - `properties` - Property tests over random carts
//! - `order_processing` - The processor against in-memory collaborators
//!
//! This library holds the shared fixtures and the in-memory CRM and
//! distributor used by those tests.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use tgf_core::{CurrencyCode, Email, FflDealerId, OrderId, OrderItemId, Price, ReceiverType};
use tgf_fulfillment::deal::DealRecord;
use tgf_fulfillment::order::{Address, Customer, FflDealer, Order, OrderItem, PaymentResult};
use tgf_fulfillment::order_number::{OrderNumber, receiver_type_for};
use tgf_fulfillment::{
    CrmGateway, DistributorGateway, DistributorOrder, DistributorResponse, GatewayError,
    StoredDeal,
};

// =============================================================================
// Order Fixtures
// =============================================================================

/// A handgun that requires FFL transfer.
#[must_use]
pub fn firearm(id: i32, price_cents: i64, drop_ship: bool) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(id),
        name: format!("GLOCK 19 Gen5 #{id}"),
        sku: format!("PA195S20{id}"),
        distributor_stock_number: format!("GLPA195S20{id}"),
        upc: Some(format!("7643410{id:05}")),
        manufacturer: Some("Glock".to_string()),
        category: Some("Handguns".to_string()),
        unit_price: Decimal::new(price_cents, 2),
        quantity: 1,
        requires_ffl: true,
        drop_ship_eligible: drop_ship,
        in_house_only: false,
        is_firearm: true,
    }
}

/// A drop-ship eligible accessory.
#[must_use]
pub fn accessory(id: i32, price_cents: i64, quantity: u32) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(id),
        name: format!("Magpul PMAG #{id}"),
        sku: format!("MAG571-{id}"),
        distributor_stock_number: format!("MPIMAG571-{id}"),
        upc: None,
        manufacturer: Some("Magpul".to_string()),
        category: Some("Magazines".to_string()),
        unit_price: Decimal::new(price_cents, 2),
        quantity,
        requires_ffl: false,
        drop_ship_eligible: true,
        in_house_only: false,
        is_firearm: false,
    }
}

/// Paid order with an FFL dealer on file. The receiver type in the order
/// number follows the items.
#[must_use]
pub fn order(sequence: i64, items: Vec<OrderItem>) -> Order {
    let mut order = Order {
        id: OrderId::new(i32::try_from(sequence).unwrap_or(i32::MAX)),
        order_number: OrderNumber::new(sequence, ReceiverType::Individual)
            .expect("fixture sequence in range"),
        customer: Customer {
            email: Email::parse("jordan.miles@example.com").expect("valid email"),
            first_name: "Jordan".to_string(),
            last_name: "Miles".to_string(),
            phone: Some("406-555-0199".to_string()),
            company: None,
        },
        items,
        shipping_address: Address {
            name: "Jordan Miles".to_string(),
            address1: "12 Range Rd".to_string(),
            address2: None,
            city: "Bozeman".to_string(),
            state: "MT".to_string(),
            zip_code: "59715".to_string(),
        },
        billing_address: Address::default(),
        ffl_dealer: Some(FflDealer {
            id: FflDealerId::new(501),
            business_name: "Big Sky Firearms".to_string(),
            license_number: "9-81-031-01-3B-54321".to_string(),
            city: Some("Bozeman".to_string()),
            state: Some("MT".to_string()),
        }),
        payment: PaymentResult {
            amount: Price::usd_cents(0),
            authorization_code: "A1B2C3".to_string(),
            transaction_id: "40012345678".to_string(),
            approved: true,
        },
        created_at: submitted_at(),
    };
    order.order_number = OrderNumber::new(sequence, receiver_type_for(&order))
        .expect("fixture sequence in range");
    order.payment.amount = Price::new(order.total().expect("fixture total in range"), CurrencyCode::USD);
    order
}

/// The same order with no FFL dealer selected.
#[must_use]
pub fn without_dealer(mut order: Order) -> Order {
    order.ffl_dealer = None;
    order
}

#[must_use]
pub fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 15, 30, 0)
        .single()
        .expect("valid timestamp")
}

#[must_use]
pub fn received_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 16, 5, 12)
        .single()
        .expect("valid timestamp")
}

/// Engine success body for a PO number.
#[must_use]
pub fn success_body(po_number: &str) -> String {
    format!(
        r#"{{"result":{{"StatusCode":"00","StatusMessage":"Order accepted","OrderNumber":"RSR-{po_number}","TrackingNumber":"1Z{po_number}","Carrier":"UPS"}}}}"#
    )
}

/// Engine failure body.
#[must_use]
pub fn failure_body(message: &str) -> String {
    format!(r#"{{"result":{{"StatusCode":"30","StatusMessage":"{message}"}}}}"#)
}

// =============================================================================
// In-Memory CRM
// =============================================================================

#[derive(Debug, Default)]
struct CrmState {
    contacts: BTreeMap<String, String>,
    products: BTreeMap<String, String>,
    deals: BTreeMap<String, (String, DealRecord)>,
    patches: Vec<String>,
    next_id: u64,
}

impl CrmState {
    fn allocate(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// CRM keeping records in memory, with find-or-create upserts.
#[derive(Debug, Default)]
pub struct InMemoryCrm {
    state: Mutex<CrmState>,
    /// Order numbers whose deal upsert the CRM rejects.
    failing_deals: BTreeSet<String>,
}

impl InMemoryCrm {
    #[must_use]
    pub fn failing_deals(order_numbers: &[&str]) -> Self {
        Self {
            failing_deals: order_numbers.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    fn state(&self) -> MutexGuard<'_, CrmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current stored version of a deal.
    #[must_use]
    pub fn deal(&self, order_number: &str) -> Option<DealRecord> {
        self.state()
            .deals
            .get(order_number)
            .map(|(_, deal)| deal.clone())
    }

    #[must_use]
    pub fn deal_count(&self) -> usize {
        self.state().deals.len()
    }

    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.state().contacts.len()
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        self.state().products.len()
    }

    /// Deal ids patched, in call order.
    #[must_use]
    pub fn patches(&self) -> Vec<String> {
        self.state().patches.clone()
    }
}

impl CrmGateway for InMemoryCrm {
    async fn upsert_contact(&self, customer: &Customer) -> Result<String, GatewayError> {
        let mut state = self.state();
        let key = customer.email.lookup_key();
        if let Some(id) = state.contacts.get(&key) {
            return Ok(id.clone());
        }
        let id = state.allocate("contact");
        state.contacts.insert(key, id.clone());
        Ok(id)
    }

    async fn upsert_product(&self, item: &OrderItem) -> Result<String, GatewayError> {
        let mut state = self.state();
        if let Some(id) = state.products.get(&item.sku) {
            return Ok(id.clone());
        }
        let id = state.allocate("product");
        state.products.insert(item.sku.clone(), id.clone());
        Ok(id)
    }

    async fn upsert_deal(&self, deal: &DealRecord) -> Result<StoredDeal, GatewayError> {
        if self.failing_deals.contains(&deal.order_number) {
            return Err(GatewayError::Rejected {
                service: "crm",
                message: "INVALID_DATA: Subform_1".to_string(),
            });
        }

        let mut state = self.state();
        if let Some((id, stored)) = state.deals.get(&deal.order_number) {
            return Ok(StoredDeal {
                id: id.clone(),
                deal: stored.clone(),
            });
        }
        let id = state.allocate("deal");
        state
            .deals
            .insert(deal.order_number.clone(), (id.clone(), deal.clone()));
        Ok(StoredDeal {
            id,
            deal: deal.clone(),
        })
    }

    async fn patch_deal(&self, deal_id: &str, deal: &DealRecord) -> Result<(), GatewayError> {
        let mut state = self.state();
        let Some(entry) = state.deals.get_mut(&deal.order_number) else {
            return Err(GatewayError::NotFound(deal_id.to_string()));
        };
        if entry.0 != deal_id {
            return Err(GatewayError::NotFound(deal_id.to_string()));
        }
        entry.1 = deal.clone();
        state.patches.push(deal_id.to_string());
        Ok(())
    }
}

// =============================================================================
// Scripted Distributor
// =============================================================================

/// How the distributor answers a given PO number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    Confirm,
    Reject(String),
    Unreachable,
}

/// Distributor answering each PO number per a script; unscripted POs are
/// confirmed.
#[derive(Debug, Default)]
pub struct ScriptedDistributor {
    scripts: BTreeMap<String, Script>,
    submitted: Mutex<Vec<DistributorOrder>>,
}

impl ScriptedDistributor {
    #[must_use]
    pub fn with(mut self, po_number: &str, script: Script) -> Self {
        self.scripts.insert(po_number.to_string(), script);
        self
    }

    /// Every submission received, in call order.
    #[must_use]
    pub fn submitted(&self) -> Vec<DistributorOrder> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DistributorGateway for ScriptedDistributor {
    async fn submit(&self, order: &DistributorOrder) -> Result<DistributorResponse, GatewayError> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(order.clone());

        let script = self
            .scripts
            .get(&order.po_number)
            .cloned()
            .unwrap_or(Script::Confirm);

        match script {
            Script::Confirm => Ok(DistributorResponse::from_raw(
                &success_body(&order.po_number),
                received_at(),
            )),
            Script::Reject(message) => Ok(DistributorResponse::from_raw(
                &failure_body(&message),
                received_at(),
            )),
            Script::Unreachable => Err(GatewayError::Unavailable {
                service: "distributor",
                message: "connection refused".to_string(),
            }),
        }
    }
}
