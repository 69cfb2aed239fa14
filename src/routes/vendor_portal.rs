use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::leads::VendorLeadList,
    dto::quotes::{CreateQuoteRequest, QuoteWithLeadStatus},
    dto::vendors::{PackageList, PackageRequest, UpdateVendorProfileRequest, VendorApplicationRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Vendor, VendorLead, VendorPackage},
    response::ApiResponse,
    routes::params::VendorLeadListQuery,
    services::{quote_service, vendor_service},
    state::AppState,
};

// Everything behind the vendor owner login: the profile, the lead inbox and
// quoting.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apply", post(apply))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/leads", get(list_leads))
        .route("/leads/{id}/view", post(view_lead))
        .route("/leads/{id}/contacted", post(mark_contacted))
        .route("/leads/{id}/quote", post(create_quote))
        .route("/quotes/{id}/cancel", post(cancel_quote))
        .route("/packages", get(list_packages).post(create_package))
        .route("/packages/{id}", put(update_package).delete(delete_package))
}

#[utoipa::path(
    post,
    path = "/api/vendor/apply",
    request_body = VendorApplicationRequest,
    responses(
        (status = 200, description = "Application submitted", body = ApiResponse<Vendor>),
        (status = 409, description = "Profile already exists"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn apply(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<VendorApplicationRequest>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let resp = vendor_service::apply(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendor/profile",
    responses(
        (status = 200, description = "Own vendor profile", body = ApiResponse<Vendor>),
        (status = 404, description = "No profile yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let resp = vendor_service::get_profile(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/vendor/profile",
    request_body = UpdateVendorProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<Vendor>),
        (status = 404, description = "No profile yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateVendorProfileRequest>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    let resp = vendor_service::update_profile(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendor/leads",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by tracking status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Lead inbox", body = ApiResponse<VendorLeadList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn list_leads(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<VendorLeadListQuery>,
) -> AppResult<Json<ApiResponse<VendorLeadList>>> {
    let resp = quote_service::list_vendor_leads(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/vendor/leads/{id}/view",
    params(("id" = Uuid, Path, description = "Vendor lead ID")),
    responses(
        (status = 200, description = "Lead marked seen", body = ApiResponse<VendorLead>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn view_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<VendorLead>>> {
    let resp = quote_service::view_vendor_lead(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/vendor/leads/{id}/contacted",
    params(("id" = Uuid, Path, description = "Vendor lead ID")),
    responses(
        (status = 200, description = "Lead marked contacted", body = ApiResponse<VendorLead>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Lead is past contacting"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn mark_contacted(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<VendorLead>>> {
    let resp = quote_service::mark_contacted(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/vendor/leads/{id}/quote",
    params(("id" = Uuid, Path, description = "Vendor lead ID")),
    request_body = CreateQuoteRequest,
    responses(
        (status = 200, description = "Quote sent", body = ApiResponse<QuoteWithLeadStatus>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Lead not quotable or a quote is already out"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn create_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateQuoteRequest>,
) -> AppResult<Json<ApiResponse<QuoteWithLeadStatus>>> {
    let resp = quote_service::create_quote(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/vendor/quotes/{id}/cancel",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote withdrawn", body = ApiResponse<QuoteWithLeadStatus>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Quote already resolved"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn cancel_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<QuoteWithLeadStatus>>> {
    let resp = quote_service::cancel_quote(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendor/packages",
    responses(
        (status = 200, description = "Own packages", body = ApiResponse<PackageList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn list_packages(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PackageList>>> {
    let resp = vendor_service::list_packages(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/vendor/packages",
    request_body = PackageRequest,
    responses(
        (status = 200, description = "Package created", body = ApiResponse<VendorPackage>),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn create_package(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PackageRequest>,
) -> AppResult<Json<ApiResponse<VendorPackage>>> {
    let resp = vendor_service::create_package(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/vendor/packages/{id}",
    params(("id" = Uuid, Path, description = "Package ID")),
    request_body = PackageRequest,
    responses(
        (status = 200, description = "Package updated", body = ApiResponse<VendorPackage>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn update_package(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PackageRequest>,
) -> AppResult<Json<ApiResponse<VendorPackage>>> {
    let resp = vendor_service::update_package(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/vendor/packages/{id}",
    params(("id" = Uuid, Path, description = "Package ID")),
    responses(
        (status = 200, description = "Package deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vendor portal"
)]
pub async fn delete_package(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = vendor_service::delete_package(&state, &user, id).await?;
    Ok(Json(resp))
}
