//! Fixed CRM deal field set.
//!
//! Field names are the CRM's API names. Optional fields serialize as `null`
//! so a patch can clear a value (e.g. a released hold).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tgf_core::{ConsigneeType, Flow, FulfillmentType, HoldType, OrderStatus, ReturnStatus};

use super::zoho_time;

/// Lookup reference to another CRM record.
///
/// `id` is absent when the referenced record has not been resolved yet; the
/// CRM then matches on `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmLookup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

/// Every top-level field written to a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealFields {
    // Core order information
    #[serde(rename = "Deal_Name")]
    pub deal_name: String,
    #[serde(rename = "TGF_Order")]
    pub tgf_order: String,
    #[serde(rename = "Fulfillment_Type")]
    pub fulfillment_type: FulfillmentType,
    #[serde(rename = "Flow")]
    pub flow: Flow,
    #[serde(rename = "Order_Status")]
    pub order_status: OrderStatus,
    /// Name of the receiving party.
    #[serde(rename = "Consignee")]
    pub consignee: String,
    #[serde(rename = "Consignee_Type")]
    pub consignee_type: ConsigneeType,
    #[serde(rename = "Ordering_Account")]
    pub ordering_account: String,

    // Compliance holds
    #[serde(rename = "Hold_Type")]
    pub hold_type: Option<HoldType>,
    #[serde(rename = "Hold_Reason")]
    pub hold_reason: Option<String>,
    #[serde(rename = "Hold_Started_At", default, with = "zoho_time::option")]
    pub hold_started_at: Option<DateTime<Utc>>,
    #[serde(rename = "Hold_Cleared_At", default, with = "zoho_time::option")]
    pub hold_cleared_at: Option<DateTime<Utc>>,

    // Distributor engine (APP) exchange
    #[serde(rename = "APP_Status")]
    pub app_status: String,
    #[serde(rename = "APP_Response")]
    pub app_response: Option<String>,
    #[serde(rename = "APP_Confirmed", default, with = "zoho_time::option")]
    pub app_confirmed: Option<DateTime<Utc>>,

    // Shipping
    #[serde(rename = "Carrier")]
    pub carrier: Option<String>,
    #[serde(rename = "Tracking_Number")]
    pub tracking_number: Option<String>,
    #[serde(rename = "Estimated_Ship_Date")]
    pub estimated_ship_date: Option<NaiveDate>,
    #[serde(rename = "Distributor_Order_Number")]
    pub distributor_order_number: Option<String>,
    #[serde(rename = "Last_Distributor_Update", default, with = "zoho_time::option")]
    pub last_distributor_update: Option<DateTime<Utc>>,
    #[serde(rename = "Submitted", with = "zoho_time")]
    pub submitted: DateTime<Utc>,

    // Standard deal fields
    #[serde(rename = "Amount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "Deal_Owner")]
    pub deal_owner: String,
    #[serde(rename = "Account_Name")]
    pub account_name: String,
    #[serde(rename = "Contact_Name")]
    pub contact_name: CrmLookup,
    #[serde(rename = "Type")]
    pub deal_type: String,
    #[serde(rename = "Next_Step")]
    pub next_step: String,
    #[serde(rename = "Lead_Source")]
    pub lead_source: String,
    #[serde(rename = "Description")]
    pub description: String,

    // Pipeline
    #[serde(rename = "Closing_Date")]
    pub closing_date: NaiveDate,
    #[serde(rename = "Pipeline")]
    pub pipeline: String,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Probability")]
    pub probability: u8,
    #[serde(rename = "Expected_Revenue", with = "rust_decimal::serde::float")]
    pub expected_revenue: Decimal,
    #[serde(rename = "Campaign_Source")]
    pub campaign_source: String,

    // System
    #[serde(rename = "Created_By")]
    pub created_by: String,
    #[serde(rename = "Modified_By")]
    pub modified_by: String,
    #[serde(rename = "Return_Status")]
    pub return_status: Option<ReturnStatus>,
}

/// One row of the deal's product subform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealLineItem {
    #[serde(rename = "Product_Name")]
    pub product_name: String,
    /// Link to the CRM product record.
    #[serde(rename = "Product_Lookup")]
    pub product_lookup: CrmLookup,
    /// Manufacturer part number.
    #[serde(rename = "Product_Code")]
    pub product_code: String,
    /// Distributor stock number; empty when the distributor has none.
    #[serde(rename = "Distributor_Part_Number")]
    pub distributor_part_number: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Product_Category")]
    pub product_category: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Unit_Price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(rename = "FFL_Required")]
    pub ffl_required: bool,
    #[serde(rename = "Drop_Ship_Eligible")]
    pub drop_ship_eligible: bool,
    #[serde(rename = "In_House_Only")]
    pub in_house_only: bool,
    #[serde(rename = "UPC")]
    pub upc: Option<String>,
}
