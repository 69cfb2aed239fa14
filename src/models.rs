use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Reference-data row shared by all taxonomy tables.
#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct TaxonomyItem {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Vendor {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub avg_price_per_person: Option<i64>,
    pub min_guest_count: Option<i32>,
    pub max_guest_count: Option<i32>,
    pub city_id: Uuid,
    pub district_id: Option<Uuid>,
    pub status: String,
    pub is_open_24_7: bool,
    pub has_refrigerated_transport: bool,
    pub is_halal_certified: bool,
    pub offers_free_tasting: bool,
    pub offers_free_delivery: bool,
    pub accepts_last_minute: bool,
    pub serves_outside_city: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorImage {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub image_url: String,
    pub is_primary: bool,
    pub sort_order: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorPackage {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_per_person: i64,
    pub min_guests: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Denormalized search result row: display names, primary image and the
/// approved-review aggregate come back in one query.
#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct VendorSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub city_name: String,
    pub district_name: Option<String>,
    pub avg_price_per_person: Option<i64>,
    pub min_guest_count: Option<i32>,
    pub max_guest_count: Option<i32>,
    pub rating_avg: Option<f64>,
    pub review_count: i64,
    pub primary_image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Lead {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub segment_id: Option<Uuid>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub service_style: Option<String>,
    pub needs_waitstaff: bool,
    pub needs_tableware: bool,
    pub needs_setup: bool,
    pub cuisine_preference: Option<String>,
    pub delivery_model: Option<String>,
    pub dietary_requirements: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorLead {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub lead_id: Uuid,
    pub status: String,
    pub viewed_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Quote {
    pub id: Uuid,
    pub vendor_lead_id: Uuid,
    pub total_price: i64,
    pub price_per_person: Option<i64>,
    pub message: Option<String>,
    pub valid_until: DateTime<Utc>,
    /// Effective status: an unresolved quote past `valid_until` reads as
    /// `expired` without being written back.
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vendor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Derived view over approved reviews, recomputed on read.
#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct RatingSummary {
    pub rating_avg: Option<f64>,
    pub review_count: i64,
}
