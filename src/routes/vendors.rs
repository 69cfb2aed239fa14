use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::reviews::ReviewList,
    dto::vendors::{SearchResults, VendorDetail},
    error::AppResult,
    response::ApiResponse,
    routes::params::{Pagination, VendorSearchQuery},
    services::{review_service, search_service, vendor_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_vendors))
        .route("/{slug}", get(get_vendor))
        .route("/{slug}/reviews", get(list_vendor_reviews))
}

#[utoipa::path(
    get,
    path = "/api/vendors",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 12"),
        ("city" = Option<Uuid>, Query, description = "Filter by city id"),
        ("district" = Option<Uuid>, Query, description = "Filter by district id"),
        ("category" = Option<Uuid>, Query, description = "Filter by category id"),
        ("segment" = Option<Uuid>, Query, description = "Filter by customer segment id"),
        ("min_price" = Option<i64>, Query, description = "Minimum average price per person"),
        ("max_price" = Option<i64>, Query, description = "Maximum average price per person"),
        ("min_guest" = Option<i32>, Query, description = "Required guest capacity"),
        ("max_guest" = Option<i32>, Query, description = "Upper guest capacity bound"),
        ("services" = Option<String>, Query, description = "Comma list of service slugs"),
        ("cuisines" = Option<String>, Query, description = "Comma list of cuisine slugs"),
        ("delivery_models" = Option<String>, Query, description = "Comma list of delivery model slugs"),
        ("tags" = Option<String>, Query, description = "Comma list of tag slugs"),
        ("open_24_7" = Option<bool>, Query, description = "Only vendors open around the clock"),
        ("refrigerated_transport" = Option<bool>, Query, description = "Only vendors with refrigerated transport"),
        ("halal" = Option<bool>, Query, description = "Only halal-certified vendors"),
        ("free_tasting" = Option<bool>, Query, description = "Only vendors offering a free tasting"),
        ("free_delivery" = Option<bool>, Query, description = "Only vendors with free delivery"),
        ("last_minute" = Option<bool>, Query, description = "Only vendors accepting last-minute orders"),
        ("outside_city" = Option<bool>, Query, description = "Only vendors serving outside their city"),
        ("q" = Option<String>, Query, description = "Free-text search on name and description"),
        ("sort" = Option<String>, Query, description = "Sort: rating (default), price, newest")
    ),
    responses(
        (status = 200, description = "Search approved vendors", body = ApiResponse<SearchResults>),
    ),
    tag = "Vendors"
)]
pub async fn search_vendors(
    State(state): State<AppState>,
    Query(query): Query<VendorSearchQuery>,
) -> Json<ApiResponse<SearchResults>> {
    Json(search_service::search_vendors(&state, query).await)
}

#[utoipa::path(
    get,
    path = "/api/vendors/{slug}",
    params(("slug" = String, Path, description = "Vendor slug")),
    responses(
        (status = 200, description = "Vendor detail", body = ApiResponse<VendorDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<VendorDetail>>> {
    let resp = vendor_service::get_vendor_detail(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendors/{slug}/reviews",
    params(
        ("slug" = String, Path, description = "Vendor slug"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Approved reviews", body = ApiResponse<ReviewList>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Vendors"
)]
pub async fn list_vendor_reviews(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_vendor_reviews(&state.pool, &slug, pagination).await?;
    Ok(Json(resp))
}
