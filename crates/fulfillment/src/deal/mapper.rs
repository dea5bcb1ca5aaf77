//! Order + shipment group → CRM deal projection.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tgf_core::{ConsigneeType, Flow, FulfillmentType, HoldType, OrderStatus, round_cents};
use tracing::info;

use super::{CrmLookup, DealContext, DealFields, DealLineItem, DealRecord, HoldDecision};
use crate::classifier::ClassifiedItem;
use crate::order::Order;
use crate::splitter::ShipmentGroup;

/// Where a shipment group physically goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingOutcome {
    DropShipToCustomer,
    DropShipToFfl,
    InHouse,
}

impl ShippingOutcome {
    #[must_use]
    pub const fn of(group: &ShipmentGroup) -> Self {
        match (group.fulfillment_type, group.consignee_type) {
            (FulfillmentType::InHouse, _) => Self::InHouse,
            (FulfillmentType::DropShip, ConsigneeType::FflDealer) => Self::DropShipToFfl,
            (FulfillmentType::DropShip, _) => Self::DropShipToCustomer,
        }
    }

    /// Suffix of the deal name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DropShipToCustomer => "Direct Shipment",
            Self::DropShipToFfl => "FFL Shipment",
            Self::InHouse => "In-House Processing",
        }
    }

    /// Business days from submission until the group is expected to ship.
    #[must_use]
    pub const fn lead_days(&self) -> u64 {
        match self {
            Self::DropShipToCustomer => 1,
            Self::DropShipToFfl => 2,
            Self::InHouse => 3,
        }
    }
}

/// Payment summary recorded in `APP_Response` when a deal is created.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentSummary<'a> {
    payment_approved: bool,
    authorization_code: &'a str,
    transaction_id: &'a str,
    amount: String,
}

/// Render one shipment group as a CRM deal.
///
/// Pure: no clock, no network. Holds come from `ctx.hold` when a compliance
/// rule decided one; otherwise a group consigned to an FFL dealer on an order
/// without a dealer is held as "FFL not on file".
#[must_use]
pub fn map_to_deal(order: &Order, group: &ShipmentGroup, ctx: &DealContext) -> DealRecord {
    let order_number = format!("{}{}", order.order_number, group.suffix);
    let amount = group.amount();
    let outcome = ShippingOutcome::of(group);
    let hold = resolve_hold(order, group, ctx);
    let defaults = &ctx.defaults;
    let submitted_on = ctx.submitted_at.date_naive();

    if let Some(hold) = &hold {
        info!(
            order_number = %order_number,
            hold_type = hold.hold_type.label(),
            "Deal created on hold"
        );
    }

    let (order_status, stage, app_status, next_step) = match &hold {
        Some(hold) => (
            OrderStatus::Hold,
            "On Hold",
            "Hold Initiated".to_string(),
            format!("Resolve hold: {}", hold.reason),
        ),
        None => (
            OrderStatus::Submitted,
            "Submitted",
            "Submitted".to_string(),
            match group.fulfillment_type {
                FulfillmentType::DropShip => "Submit to distributor".to_string(),
                FulfillmentType::InHouse => "Receive in-house".to_string(),
            },
        ),
    };

    let fields = DealFields {
        deal_name: format!("TGF Order {order_number} - {}", outcome.label()),
        tgf_order: order_number.clone(),
        fulfillment_type: group.fulfillment_type,
        flow: Flow::Outbound,
        order_status,
        consignee: consignee_name(order, group),
        consignee_type: group.consignee_type,
        ordering_account: group.ordering_account.clone(),
        hold_type: hold.as_ref().map(|h| h.hold_type),
        hold_reason: hold.as_ref().map(|h| h.reason.clone()),
        hold_started_at: hold.as_ref().map(|_| ctx.submitted_at),
        hold_cleared_at: None,
        app_status,
        app_response: payment_summary(order),
        app_confirmed: None,
        carrier: None,
        tracking_number: None,
        estimated_ship_date: estimated_ship_date(submitted_on, outcome),
        distributor_order_number: None,
        last_distributor_update: None,
        submitted: ctx.submitted_at,
        amount,
        deal_owner: defaults.deal_owner.clone(),
        account_name: order
            .customer
            .company_name()
            .map_or_else(|| defaults.account_name.clone(), str::to_string),
        contact_name: CrmLookup {
            id: ctx.references.contact_id.clone(),
            name: order.customer.full_name(),
        },
        deal_type: defaults.deal_type.clone(),
        next_step,
        lead_source: defaults.lead_source.clone(),
        description: describe(order, group, &order_number, outcome),
        closing_date: submitted_on,
        pipeline: defaults.pipeline.clone(),
        stage: stage.to_string(),
        probability: 100,
        expected_revenue: amount,
        campaign_source: defaults.campaign_source.clone(),
        created_by: defaults.deal_owner.clone(),
        modified_by: defaults.deal_owner.clone(),
        return_status: None,
    };

    let line_items = group
        .items
        .iter()
        .map(|line| map_line_item(line, ctx))
        .collect();

    DealRecord {
        order_number,
        amount,
        fields,
        line_items,
    }
}

fn resolve_hold(order: &Order, group: &ShipmentGroup, ctx: &DealContext) -> Option<HoldDecision> {
    ctx.hold.clone().or_else(|| {
        (group.consignee_type == ConsigneeType::FflDealer && order.ffl_dealer.is_none())
            .then(HoldDecision::ffl_not_on_file)
    })
}

/// Display name of whoever receives the group. Never invents a dealer.
fn consignee_name(order: &Order, group: &ShipmentGroup) -> String {
    match group.consignee_type {
        ConsigneeType::Customer => order
            .customer
            .company_name()
            .map_or_else(|| order.customer.full_name(), str::to_string),
        ConsigneeType::FflDealer => order.ffl_dealer.as_ref().map_or_else(
            || HoldType::FflNotOnFile.label().to_string(),
            |dealer| dealer.business_name.clone(),
        ),
        ConsigneeType::Tgf => "TGF".to_string(),
    }
}

fn estimated_ship_date(submitted_on: NaiveDate, outcome: ShippingOutcome) -> Option<NaiveDate> {
    submitted_on.checked_add_days(Days::new(outcome.lead_days()))
}

fn payment_summary(order: &Order) -> Option<String> {
    let payment = &order.payment;
    serde_json::to_string(&PaymentSummary {
        payment_approved: payment.approved,
        authorization_code: &payment.authorization_code,
        transaction_id: &payment.transaction_id,
        amount: payment.amount.display(),
    })
    .ok()
}

fn describe(
    order: &Order,
    group: &ShipmentGroup,
    order_number: &str,
    outcome: ShippingOutcome,
) -> String {
    let items = group
        .items
        .iter()
        .map(|line| format!("{}x {} ({})", line.item.quantity, line.item.name, line.item.sku))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "TGF Order {order_number}: {items}. Customer: {}. Shipping: {}.",
        order.customer.full_name(),
        outcome.label()
    )
}

fn map_line_item(line: &ClassifiedItem, ctx: &DealContext) -> DealLineItem {
    let item = &line.item;
    DealLineItem {
        product_name: item.name.clone(),
        product_lookup: CrmLookup {
            id: ctx.references.product_ids.get(&item.sku).cloned(),
            name: item.name.clone(),
        },
        product_code: item.sku.clone(),
        distributor_part_number: item.distributor_stock_number.clone(),
        manufacturer: item.manufacturer.clone(),
        product_category: item.category.clone(),
        quantity: item.quantity,
        unit_price: round_cents(item.unit_price),
        ffl_required: line.classification.requires_ffl,
        drop_ship_eligible: line.classification.drop_ship_eligible,
        in_house_only: item.in_house_only,
        upc: item.upc.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::config::{DealDefaults, Environment};
    use crate::deal::{CrmReferences, DealValidationError, MAX_TEXT_LENGTH};
    use crate::splitter::split;
    use crate::test_support::{accessory, firearm, sample_order};

    fn ctx() -> DealContext {
        DealContext::new(
            Utc.with_ymd_and_hms(2025, 6, 2, 15, 30, 0).unwrap(),
            DealDefaults::default(),
        )
    }

    #[test]
    fn test_required_fields_populated() {
        let order = sample_order(vec![accessory(1, Decimal::new(2_999, 2), 2)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let deal = map_to_deal(&order, &groups[0], &ctx());

        assert_eq!(deal.order_number, "0001234IA");
        assert_eq!(deal.fields.tgf_order, "0001234IA");
        assert_eq!(deal.fields.deal_name, "TGF Order 0001234IA - Direct Shipment");
        assert_eq!(deal.fields.order_status, OrderStatus::Submitted);
        assert_eq!(deal.fields.fulfillment_type, FulfillmentType::DropShip);
        assert_eq!(deal.fields.consignee_type, ConsigneeType::Customer);
        assert_eq!(deal.fields.consignee, "Dana Reyes");
        assert_eq!(deal.fields.ordering_account, "99902");
        assert_eq!(deal.amount, Decimal::new(5_998, 2));
        assert_eq!(deal.fields.expected_revenue, deal.amount);
        assert_eq!(deal.fields.submitted, ctx().submitted_at);
        assert_eq!(
            deal.fields.estimated_ship_date,
            NaiveDate::from_ymd_opt(2025, 6, 3)
        );
        assert!(deal.validate().is_empty());
    }

    #[test]
    fn test_missing_ffl_dealer_holds_without_fabrication() {
        let order = sample_order(vec![firearm(1, Decimal::new(54_999, 2), true)], false);
        let groups = split(&order, &Environment::test()).unwrap();
        let deal = map_to_deal(&order, &groups[0], &ctx());

        assert_eq!(deal.fields.hold_type, Some(HoldType::FflNotOnFile));
        assert_eq!(deal.fields.order_status, OrderStatus::Hold);
        assert_eq!(deal.fields.hold_started_at, Some(ctx().submitted_at));
        assert_eq!(deal.fields.consignee, "FFL not on file");
        assert_eq!(deal.fields.consignee_type, ConsigneeType::FflDealer);
    }

    #[test]
    fn test_ffl_dealer_named_as_consignee() {
        let order = sample_order(vec![firearm(1, Decimal::new(54_999, 2), true)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let deal = map_to_deal(&order, &groups[0], &ctx());

        assert!(!deal.is_held());
        assert_eq!(deal.fields.consignee, "Lone Star Arms LLC");
        assert_eq!(deal.fields.deal_name, "TGF Order 0001234FA - FFL Shipment");
    }

    #[test]
    fn test_external_hold_is_used_as_given() {
        let order = sample_order(vec![firearm(1, Decimal::new(54_999, 2), true)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let hold = HoldDecision {
            hold_type: HoldType::GunCountRule,
            reason: "Third handgun this month".to_string(),
        };
        let deal = map_to_deal(&order, &groups[0], &ctx().with_hold(hold));

        assert_eq!(deal.fields.hold_type, Some(HoldType::GunCountRule));
        assert_eq!(
            deal.fields.hold_reason.as_deref(),
            Some("Third handgun this month")
        );
    }

    #[test]
    fn test_amount_has_no_float_residue() {
        // 3 x 0.1 + 1 x 0.2 is 0.5000000000000001 in binary floating point.
        let order = sample_order(
            vec![
                accessory(1, Decimal::new(1, 1), 3),
                accessory(2, Decimal::new(2, 1), 1),
            ],
            true,
        );
        let groups = split(&order, &Environment::test()).unwrap();
        let deal = map_to_deal(&order, &groups[0], &ctx());
        assert_eq!(deal.amount, Decimal::new(5, 1));

        let json = serde_json::to_value(&deal.fields).unwrap();
        assert_eq!(json["Amount"], serde_json::json!(0.5));
    }

    #[test]
    fn test_sku_and_distributor_number_stay_separate() {
        let mut item = accessory(1, Decimal::new(1_000, 2), 1);
        item.distributor_stock_number = String::new();
        let order = sample_order(vec![item], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let deal = map_to_deal(&order, &groups[0], &ctx());

        assert_eq!(deal.line_items[0].product_code, "SKU-1");
        assert_eq!(deal.line_items[0].distributor_part_number, "");
    }

    #[test]
    fn test_references_flow_into_lookups() {
        let order = sample_order(vec![accessory(1, Decimal::new(1_000, 2), 1)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let references = CrmReferences {
            contact_id: Some("contact-9".to_string()),
            product_ids: [("SKU-1".to_string(), "product-3".to_string())].into(),
        };
        let deal = map_to_deal(&order, &groups[0], &ctx().with_references(references));

        assert_eq!(deal.fields.contact_name.id.as_deref(), Some("contact-9"));
        assert_eq!(deal.line_items[0].product_lookup.id.as_deref(), Some("product-3"));
    }

    #[test]
    fn test_timestamps_use_crm_format() {
        let order = sample_order(vec![accessory(1, Decimal::new(1_000, 2), 1)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let deal = map_to_deal(&order, &groups[0], &ctx());
        let json = serde_json::to_value(deal.payload()).unwrap();

        assert_eq!(json["Submitted"], "2025-06-02T15:30:00");
        assert_eq!(json["Closing_Date"], "2025-06-02");
        assert_eq!(json["Hold_Type"], serde_json::Value::Null);
        assert_eq!(json["Subform_1"][0]["Product_Code"], "SKU-1");
    }

    #[test]
    fn test_validate_reports_violations() {
        let order = sample_order(vec![accessory(1, Decimal::new(1_000, 2), 1)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let mut deal = map_to_deal(&order, &groups[0], &ctx());
        deal.fields.deal_name = String::new();
        deal.amount = Decimal::ZERO;
        deal.line_items[0].quantity = 0;

        let errors = deal.validate();
        assert_eq!(
            errors,
            vec![
                DealValidationError::MissingDealName,
                DealValidationError::NonPositiveAmount(Decimal::ZERO),
                DealValidationError::ZeroQuantity { row: 0 },
            ]
        );
    }

    #[test]
    fn test_validate_reports_long_text_and_negative_price() {
        let order = sample_order(
            vec![
                accessory(1, Decimal::new(1_000, 2), 1),
                accessory(2, Decimal::new(2_000, 2), 1),
            ],
            true,
        );
        let groups = split(&order, &Environment::test()).unwrap();
        let mut deal = map_to_deal(&order, &groups[0], &ctx());
        deal.fields.deal_name = "D".repeat(MAX_TEXT_LENGTH + 1);
        deal.line_items[0].unit_price = Decimal::new(-1, 2);
        deal.line_items[1].product_code = "P".repeat(MAX_TEXT_LENGTH + 1);
        deal.line_items[1].manufacturer = Some("M".repeat(MAX_TEXT_LENGTH + 1));

        assert_eq!(
            deal.validate(),
            vec![
                DealValidationError::TooLong("Deal_Name".to_string()),
                DealValidationError::NegativeUnitPrice { row: 0 },
                DealValidationError::TooLong("Subform_1[1].Product_Code".to_string()),
                DealValidationError::TooLong("Subform_1[1].Manufacturer".to_string()),
            ]
        );
    }

    #[test]
    fn test_validate_accepts_text_at_the_limit() {
        let order = sample_order(vec![accessory(1, Decimal::new(1_000, 2), 1)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let mut deal = map_to_deal(&order, &groups[0], &ctx());
        deal.fields.deal_name = "D".repeat(MAX_TEXT_LENGTH);
        deal.line_items[0].product_code = "P".repeat(MAX_TEXT_LENGTH);
        deal.line_items[0].manufacturer = Some("M".repeat(MAX_TEXT_LENGTH));
        deal.line_items[0].unit_price = Decimal::ZERO;

        assert!(deal.validate().is_empty());
    }

    #[test]
    fn test_subsecond_submission_time_survives_json() {
        let submitted_at = Utc
            .with_ymd_and_hms(2025, 6, 2, 15, 30, 0)
            .unwrap()
            .checked_add_signed(chrono::TimeDelta::nanoseconds(123_456_789))
            .unwrap();
        let ctx = DealContext::new(submitted_at, DealDefaults::default());
        let order = sample_order(vec![accessory(1, Decimal::new(1_000, 2), 1)], true);
        let groups = split(&order, &Environment::test()).unwrap();
        let deal = map_to_deal(&order, &groups[0], &ctx);

        assert_eq!(
            deal.fields.submitted,
            Utc.with_ymd_and_hms(2025, 6, 2, 15, 30, 0).unwrap()
        );
        let json = serde_json::to_string(&deal).unwrap();
        let restored: DealRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, deal);
    }
}
