use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Quote, VendorLead};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuoteRequest {
    #[validate(range(min = 1, message = "total price must be positive"))]
    pub total_price: i64,
    pub price_per_person: Option<i64>,
    pub message: Option<String>,
    pub valid_until: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteAction {
    Accept,
    Reject,
}

/// Customer-side quote actions are authorized by the lead's access key,
/// carried in the emailed link rather than a session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteAccessRequest {
    pub access_key: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RespondQuoteRequest {
    pub access_key: Uuid,
    pub action: QuoteAction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteWithLeadStatus {
    pub quote: Quote,
    pub vendor_lead: VendorLead,
}
