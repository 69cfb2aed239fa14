use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::VendorSummary;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ToggleFavoriteRequest {
    pub vendor_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleFavoriteResult {
    /// End state after the toggle: true when the vendor is now favorited.
    pub favorited: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteVendorList {
    pub items: Vec<VendorSummary>,
}
