//! End-to-end order processing against the CRM and distributor.
//!
//! ```text
//! split → upsert contact → upsert products → per group:
//!     map deal → upsert deal → submit (drop-ship, not held) → reconcile → patch deal
//! ```
//!
//! Groups are independent. A collaborator failure is recorded on the group it
//! happened in and logged; the remaining groups are still processed.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::config::FulfillmentConfig;
use crate::deal::{
    CrmReferences, DealContext, DealRecord, DealValidationError, HoldDecision, map_to_deal,
};
use crate::distributor::DistributorOrder;
use crate::error::{FulfillmentError, GatewayError};
use crate::gateway::{CrmGateway, DistributorGateway};
use crate::order::Order;
use crate::reconciler::apply_response;
use crate::splitter::{ShipmentGroup, split};

/// What happened to a group at the distributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// In-house group. Never sent to the distributor.
    NotRequired,
    /// On compliance hold. Sent once the hold is released.
    Held,
    /// Accepted by the distributor.
    Confirmed,
    /// Accepted by the distributor on an earlier run. Not submitted again.
    AlreadyConfirmed,
    /// Answered by the distributor with a failure status.
    Rejected(String),
    /// The deal failed CRM validation and was neither stored nor submitted.
    Invalid(Vec<DealValidationError>),
    /// A collaborator call failed before a distributor answer came back.
    Failed(GatewayError),
}

/// Result of processing one shipment group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDeal {
    /// The deal as last written (reconciled if the distributor answered).
    pub deal: DealRecord,
    /// CRM id of the deal, if the upsert succeeded.
    pub deal_id: Option<String>,
    pub submission: SubmissionOutcome,
    /// Set when the reconciled deal could not be written back.
    pub patch_error: Option<GatewayError>,
}

impl ProcessedDeal {
    #[must_use]
    pub fn order_number(&self) -> &str {
        &self.deal.order_number
    }

    const fn new(deal: DealRecord, deal_id: Option<String>, submission: SubmissionOutcome) -> Self {
        Self {
            deal,
            deal_id,
            submission,
            patch_error: None,
        }
    }
}

/// Result of processing a whole order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    /// Order number without group suffix.
    pub order_number: String,
    pub contact_id: Option<String>,
    /// One entry per shipment group, in suffix order.
    pub deals: Vec<ProcessedDeal>,
}

impl OrderOutcome {
    /// Number of groups the distributor confirmed, on this run or earlier.
    #[must_use]
    pub fn confirmed(&self) -> usize {
        self.deals
            .iter()
            .filter(|d| {
                matches!(
                    d.submission,
                    SubmissionOutcome::Confirmed | SubmissionOutcome::AlreadyConfirmed
                )
            })
            .count()
    }

    /// Groups that need attention: rejected, invalid, or failed.
    pub fn failures(&self) -> impl Iterator<Item = &ProcessedDeal> {
        self.deals.iter().filter(|d| {
            matches!(
                d.submission,
                SubmissionOutcome::Rejected(_)
                    | SubmissionOutcome::Invalid(_)
                    | SubmissionOutcome::Failed(_)
            ) || d.patch_error.is_some()
        })
    }
}

/// Drives orders through splitting, CRM sync, and distributor submission.
pub struct OrderProcessor<C, D> {
    crm: C,
    distributor: D,
    config: FulfillmentConfig,
}

impl<C, D> OrderProcessor<C, D>
where
    C: CrmGateway + Sync,
    D: DistributorGateway + Sync,
{
    /// Create a processor over the given collaborators.
    pub const fn new(crm: C, distributor: D, config: FulfillmentConfig) -> Self {
        Self {
            crm,
            distributor,
            config,
        }
    }

    /// The CRM gateway.
    pub const fn crm(&self) -> &C {
        &self.crm
    }

    /// The distributor gateway.
    pub const fn distributor(&self) -> &D {
        &self.distributor
    }

    /// Process one paid order.
    ///
    /// `hold`, when given, is an externally decided compliance hold. It
    /// applies to every group that contains an FFL item; other groups
    /// proceed normally.
    ///
    /// # Errors
    ///
    /// Returns `FulfillmentError` only if the order cannot be split.
    /// Collaborator failures are reported per group in the outcome.
    #[instrument(skip_all, fields(order_number = %order.order_number))]
    pub async fn process(
        &self,
        order: &Order,
        submitted_at: DateTime<Utc>,
        hold: Option<&HoldDecision>,
    ) -> Result<OrderOutcome, FulfillmentError> {
        let groups = split(order, &self.config.environment)?;
        let references = self.resolve_references(order).await;

        let mut deals = Vec::with_capacity(groups.len());
        for group in &groups {
            let mut ctx = DealContext::new(submitted_at, self.config.deal_defaults.clone())
                .with_references(references.clone());
            if let Some(hold) = hold.filter(|_| group.requires_ffl()) {
                ctx = ctx.with_hold(hold.clone());
            }

            let deal = map_to_deal(order, group, &ctx);
            deals.push(self.process_group(group, deal).await);
        }

        let outcome = OrderOutcome {
            order_number: order.order_number.to_string(),
            contact_id: references.contact_id,
            deals,
        };

        info!(
            groups = outcome.deals.len(),
            confirmed = outcome.confirmed(),
            failures = outcome.failures().count(),
            "Order processed"
        );

        Ok(outcome)
    }

    /// Upsert the contact and each distinct product. Failures leave the
    /// corresponding reference unresolved.
    async fn resolve_references(&self, order: &Order) -> CrmReferences {
        let contact_id = match self.crm.upsert_contact(&order.customer).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, email = %order.customer.email, "Contact upsert failed");
                None
            }
        };

        let mut seen = BTreeSet::new();
        let mut product_ids = BTreeMap::new();
        for item in &order.items {
            if !seen.insert(item.sku.as_str()) {
                continue;
            }
            match self.crm.upsert_product(item).await {
                Ok(id) => {
                    product_ids.insert(item.sku.clone(), id);
                }
                Err(e) => warn!(error = %e, sku = %item.sku, "Product upsert failed"),
            }
        }

        CrmReferences {
            contact_id,
            product_ids,
        }
    }

    async fn process_group(&self, group: &ShipmentGroup, deal: DealRecord) -> ProcessedDeal {
        let errors = deal.validate();
        if !errors.is_empty() {
            warn!(order_number = %deal.order_number, ?errors, "Deal failed validation");
            return ProcessedDeal::new(deal, None, SubmissionOutcome::Invalid(errors));
        }

        let (deal_id, stored) = match self.crm.upsert_deal(&deal).await {
            Ok(stored) => (stored.id, stored.deal),
            Err(e) => {
                warn!(order_number = %deal.order_number, error = %e, "Deal upsert failed");
                return ProcessedDeal::new(deal, None, SubmissionOutcome::Failed(e));
            }
        };

        if stored.is_confirmed() {
            info!(order_number = %deal.order_number, "Deal already confirmed, skipping submission");
            return ProcessedDeal::new(stored, Some(deal_id), SubmissionOutcome::AlreadyConfirmed);
        }
        if deal.is_held() {
            return ProcessedDeal::new(deal, Some(deal_id), SubmissionOutcome::Held);
        }
        let Some(submission) = DistributorOrder::for_group(group, &deal.order_number) else {
            return ProcessedDeal::new(deal, Some(deal_id), SubmissionOutcome::NotRequired);
        };

        let response = match self.distributor.submit(&submission).await {
            Ok(response) => response,
            Err(e) => {
                warn!(order_number = %deal.order_number, error = %e, "Distributor submission failed");
                return ProcessedDeal::new(deal, Some(deal_id), SubmissionOutcome::Failed(e));
            }
        };

        let reconciled = apply_response(&deal, Some(&response));
        let outcome = if response.is_success() {
            SubmissionOutcome::Confirmed
        } else {
            SubmissionOutcome::Rejected(response.message().to_string())
        };

        let patch_error = match self.crm.patch_deal(&deal_id, &reconciled).await {
            Ok(()) => None,
            Err(e) => {
                warn!(order_number = %deal.order_number, error = %e, "Deal patch failed");
                Some(e)
            }
        };

        ProcessedDeal {
            deal: reconciled,
            deal_id: Some(deal_id),
            submission: outcome,
            patch_error,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use tgf_core::{FulfillmentType, OrderStatus};

    use super::*;
    use crate::gateway::StoredDeal;
    use crate::order::{Customer, OrderItem};
    use crate::reconciler::DistributorResponse;
    use crate::test_support::{accessory, firearm, sample_order};

    #[derive(Default)]
    struct RecordingCrm {
        products: Mutex<Vec<String>>,
        deals: Mutex<Vec<String>>,
        patches: Mutex<Vec<(String, DealRecord)>>,
    }

    impl CrmGateway for RecordingCrm {
        async fn upsert_contact(&self, customer: &Customer) -> Result<String, GatewayError> {
            Ok(format!("contact:{}", customer.email.lookup_key()))
        }

        async fn upsert_product(&self, item: &OrderItem) -> Result<String, GatewayError> {
            self.products.lock().unwrap().push(item.sku.clone());
            Ok(format!("product:{}", item.sku))
        }

        async fn upsert_deal(&self, deal: &DealRecord) -> Result<StoredDeal, GatewayError> {
            self.deals.lock().unwrap().push(deal.order_number.clone());
            // Latest patched version wins over the incoming record.
            let stored = self
                .patches
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(_, patched)| patched.order_number == deal.order_number)
                .map_or_else(|| deal.clone(), |(_, patched)| patched.clone());
            Ok(StoredDeal {
                id: format!("deal:{}", deal.order_number),
                deal: stored,
            })
        }

        async fn patch_deal(&self, deal_id: &str, deal: &DealRecord) -> Result<(), GatewayError> {
            self.patches
                .lock()
                .unwrap()
                .push((deal_id.to_string(), deal.clone()));
            Ok(())
        }
    }

    /// Confirms everything except PO numbers listed in `unreachable`.
    #[derive(Default)]
    struct ScriptedDistributor {
        unreachable: Vec<String>,
        submitted: Mutex<Vec<DistributorOrder>>,
    }

    impl DistributorGateway for ScriptedDistributor {
        async fn submit(
            &self,
            order: &DistributorOrder,
        ) -> Result<DistributorResponse, GatewayError> {
            self.submitted.lock().unwrap().push(order.clone());
            if self.unreachable.contains(&order.po_number) {
                return Err(GatewayError::Unavailable {
                    service: "distributor",
                    message: "timed out".to_string(),
                });
            }
            Ok(DistributorResponse::from_raw(
                &format!(
                    r#"{{"StatusCode":"00","StatusMessage":"OK","OrderNumber":"R-{}"}}"#,
                    order.po_number
                ),
                received_at(),
            ))
        }
    }

    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 16, 0, 0).unwrap()
    }

    fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 15, 30, 0).unwrap()
    }

    fn processor(distributor: ScriptedDistributor) -> OrderProcessor<RecordingCrm, ScriptedDistributor> {
        OrderProcessor::new(
            RecordingCrm::default(),
            distributor,
            FulfillmentConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_drop_ship_group_confirmed_and_patched() {
        let processor = processor(ScriptedDistributor::default());
        let order = sample_order(vec![accessory(1, Decimal::new(2_999, 2), 2)], false);

        let outcome = processor.process(&order, submitted_at(), None).await.unwrap();

        assert_eq!(outcome.order_number, "0001234I");
        assert_eq!(outcome.confirmed(), 1);
        let processed = &outcome.deals[0];
        assert_eq!(processed.order_number(), "0001234IA");
        assert_eq!(processed.deal.fields.order_status, OrderStatus::Confirmed);
        assert_eq!(
            processed.deal.fields.distributor_order_number.as_deref(),
            Some("R-0001234IA")
        );

        let patches = processor.crm().patches.lock().unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].0, "deal:0001234IA");
    }

    #[tokio::test]
    async fn test_confirmed_group_not_resubmitted() {
        let processor = processor(ScriptedDistributor::default());
        let order = sample_order(vec![accessory(1, Decimal::new(2_999, 2), 1)], false);

        processor.process(&order, submitted_at(), None).await.unwrap();
        let again = processor.process(&order, submitted_at(), None).await.unwrap();

        assert_eq!(again.deals[0].submission, SubmissionOutcome::AlreadyConfirmed);
        assert_eq!(again.deals[0].deal.fields.order_status, OrderStatus::Confirmed);
        assert_eq!(again.confirmed(), 1);
        assert_eq!(processor.distributor().submitted.lock().unwrap().len(), 1);
        assert_eq!(processor.crm().patches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_in_house_group_not_submitted() {
        let processor = processor(ScriptedDistributor::default());
        let order = sample_order(vec![firearm(1, Decimal::new(54_999, 2), false)], true);

        let outcome = processor.process(&order, submitted_at(), None).await.unwrap();

        assert_eq!(outcome.deals[0].deal.fields.fulfillment_type, FulfillmentType::InHouse);
        assert_eq!(outcome.deals[0].submission, SubmissionOutcome::NotRequired);
        assert!(processor.distributor().submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_skus_upserted_once() {
        let processor = processor(ScriptedDistributor::default());
        let order = sample_order(
            vec![
                accessory(1, Decimal::new(1_000, 2), 1),
                accessory(1, Decimal::new(1_000, 2), 2),
                accessory(2, Decimal::new(500, 2), 1),
            ],
            false,
        );

        processor.process(&order, submitted_at(), None).await.unwrap();

        assert_eq!(
            *processor.crm().products.lock().unwrap(),
            vec!["SKU-1".to_string(), "SKU-2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_submission_failure_recorded_on_group() {
        let processor = processor(ScriptedDistributor {
            unreachable: vec!["0001234IA".to_string()],
            ..ScriptedDistributor::default()
        });
        let order = sample_order(vec![accessory(1, Decimal::new(2_999, 2), 1)], false);

        let outcome = processor.process(&order, submitted_at(), None).await.unwrap();

        let processed = &outcome.deals[0];
        assert!(matches!(processed.submission, SubmissionOutcome::Failed(_)));
        assert_eq!(processed.deal.fields.order_status, OrderStatus::Submitted);
        assert_eq!(processed.deal_id.as_deref(), Some("deal:0001234IA"));
        assert_eq!(outcome.failures().count(), 1);
        assert!(processor.crm().patches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_order_is_an_error() {
        let processor = processor(ScriptedDistributor::default());
        let order = sample_order(Vec::new(), false);

        let err = processor.process(&order, submitted_at(), None).await.unwrap_err();
        assert!(matches!(err, FulfillmentError::EmptyOrder(_)));
        assert!(processor.crm().deals.lock().unwrap().is_empty());
    }
}
