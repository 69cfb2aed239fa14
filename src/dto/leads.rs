use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Lead, Quote, VendorLead};

/// Public lead submission body. Field names follow the form payload contract
/// (camelCase on the wire).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    pub vendor_id: Uuid,
    #[validate(length(min = 1, message = "customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "invalid email address"))]
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub segment_id: Option<Uuid>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub service_style: Option<String>,
    #[serde(default)]
    pub needs_waitstaff: bool,
    #[serde(default)]
    pub needs_tableware: bool,
    #[serde(default)]
    pub needs_setup: bool,
    pub cuisine_preference: Option<String>,
    pub delivery_model: Option<String>,
    #[serde(default)]
    pub dietary_requirements: Vec<String>,
    pub notes: Option<String>,
    pub anti_automation_token: String,
    #[validate(length(min = 1, message = "idempotency key is required"))]
    pub idempotency_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadCreated {
    pub lead_id: Uuid,
    pub vendor_lead_id: Uuid,
}

/// What a vendor sees in their lead inbox: the tracking row, the request
/// itself, and the active quote if one is out.
#[derive(Debug, Serialize, ToSchema)]
pub struct VendorLeadWithLead {
    pub vendor_lead: VendorLead,
    pub lead: Lead,
    pub active_quote: Option<Quote>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorLeadList {
    pub items: Vec<VendorLeadWithLead>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLeadNotesRequest {
    pub internal_notes: String,
}
