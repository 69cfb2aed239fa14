use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    RatingSummary, TaxonomyItem, Vendor, VendorImage, VendorPackage, VendorSummary,
};

/// Paginated search result envelope for the vendor listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResults {
    pub items: Vec<VendorSummary>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl SearchResults {
    pub fn empty(page: i64, page_size: i64) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
            page_size,
            total_pages: 0,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorDetail {
    pub vendor: Vendor,
    pub city: TaxonomyItem,
    pub district: Option<TaxonomyItem>,
    pub categories: Vec<TaxonomyItem>,
    pub services: Vec<TaxonomyItem>,
    pub cuisines: Vec<TaxonomyItem>,
    pub delivery_models: Vec<TaxonomyItem>,
    pub tags: Vec<TaxonomyItem>,
    pub segments: Vec<TaxonomyItem>,
    pub images: Vec<VendorImage>,
    pub packages: Vec<VendorPackage>,
    pub rating: RatingSummary,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VendorApplicationRequest {
    #[validate(length(min = 2, max = 120, message = "name must be 2-120 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub city_id: Uuid,
    pub district_id: Option<Uuid>,
    pub phone: Option<String>,
    #[validate(email(message = "invalid contact email"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct UpdateVendorProfileRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub avg_price_per_person: Option<i64>,
    pub min_guest_count: Option<i32>,
    pub max_guest_count: Option<i32>,
    pub district_id: Option<Uuid>,
    pub is_open_24_7: Option<bool>,
    pub has_refrigerated_transport: Option<bool>,
    pub is_halal_certified: Option<bool>,
    pub offers_free_tasting: Option<bool>,
    pub offers_free_delivery: Option<bool>,
    pub accepts_last_minute: Option<bool>,
    pub serves_outside_city: Option<bool>,
    /// When present, replaces the vendor's association set wholesale.
    pub category_ids: Option<Vec<Uuid>>,
    pub service_ids: Option<Vec<Uuid>>,
    pub cuisine_ids: Option<Vec<Uuid>>,
    pub delivery_model_ids: Option<Vec<Uuid>>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub segment_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PackageRequest {
    #[validate(length(min = 1, message = "package name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "price per person must be positive"))]
    pub price_per_person: i64,
    pub min_guests: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PackageList {
    pub items: Vec<VendorPackage>,
}
