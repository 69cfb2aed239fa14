use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::leads::UpdateLeadNotesRequest,
    dto::reviews::ReviewList,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Vendor,
    response::ApiResponse,
    routes::params::Pagination,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vendors", get(list_vendors))
        .route("/vendors/{id}/status", patch(update_vendor_status))
        .route("/reviews/pending", get(list_pending_reviews))
        .route("/reviews/{id}", patch(moderate_review))
        .route("/leads/{id}/notes", patch(update_lead_notes))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VendorListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVendorStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ModerateReviewRequest {
    pub approve: bool,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct VendorList {
    pub items: Vec<Vendor>,
}

#[utoipa::path(
    get,
    path = "/api/admin/vendors",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by vendor status")
    ),
    responses(
        (status = 200, description = "All vendors (admin only)", body = ApiResponse<VendorList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<VendorListQuery>,
) -> AppResult<Json<ApiResponse<VendorList>>> {
    let resp = admin_service::list_vendors(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/vendors/{id}/status",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    request_body = UpdateVendorStatusRequest,
    responses(
        (status = 200, description = "Vendor status updated", body = ApiResponse<Vendor>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_vendor_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVendorStatusRequest>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let resp = admin_service::update_vendor_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reviews/pending",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Moderation queue", body = ApiResponse<ReviewList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_pending_reviews(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = admin_service::list_pending_reviews(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = ModerateReviewRequest,
    responses(
        (status = 200, description = "Review approved or rejected", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn moderate_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModerateReviewRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::moderate_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/leads/{id}/notes",
    params(("id" = Uuid, Path, description = "Lead ID")),
    request_body = UpdateLeadNotesRequest,
    responses(
        (status = 200, description = "Internal notes updated", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_lead_notes(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadNotesRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::update_lead_notes(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
