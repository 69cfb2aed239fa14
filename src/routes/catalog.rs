use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::catalog::{CityWithDistricts, ServiceGroupWithServices, TagGroupWithTags, TaxonomyList},
    error::AppResult,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cities", get(list_cities))
        .route("/categories", get(list_categories))
        .route("/services", get(list_services))
        .route("/cuisines", get(list_cuisines))
        .route("/delivery-models", get(list_delivery_models))
        .route("/tags", get(list_tags))
        .route("/segments", get(list_segments))
}

#[utoipa::path(
    get,
    path = "/api/catalog/cities",
    responses(
        (status = 200, description = "Cities with districts", body = ApiResponse<Vec<CityWithDistricts>>),
    ),
    tag = "Catalog"
)]
pub async fn list_cities(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CityWithDistricts>>>> {
    let resp = catalog_service::cities_with_districts(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/categories",
    responses(
        (status = 200, description = "Vendor categories", body = ApiResponse<TaxonomyList>),
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TaxonomyList>>> {
    let resp = catalog_service::flat_list(&state.pool, "categories").await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/services",
    responses(
        (status = 200, description = "Services nested under their groups", body = ApiResponse<Vec<ServiceGroupWithServices>>),
    ),
    tag = "Catalog"
)]
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ServiceGroupWithServices>>>> {
    let resp = catalog_service::service_groups_with_services(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/cuisines",
    responses(
        (status = 200, description = "Cuisine types", body = ApiResponse<TaxonomyList>),
    ),
    tag = "Catalog"
)]
pub async fn list_cuisines(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TaxonomyList>>> {
    let resp = catalog_service::flat_list(&state.pool, "cuisine_types").await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/delivery-models",
    responses(
        (status = 200, description = "Delivery models", body = ApiResponse<TaxonomyList>),
    ),
    tag = "Catalog"
)]
pub async fn list_delivery_models(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TaxonomyList>>> {
    let resp = catalog_service::flat_list(&state.pool, "delivery_models").await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/tags",
    responses(
        (status = 200, description = "Tags nested under their groups", body = ApiResponse<Vec<TagGroupWithTags>>),
    ),
    tag = "Catalog"
)]
pub async fn list_tags(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TagGroupWithTags>>>> {
    let resp = catalog_service::tag_groups_with_tags(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/segments",
    responses(
        (status = 200, description = "Customer segments", body = ApiResponse<TaxonomyList>),
    ),
    tag = "Catalog"
)]
pub async fn list_segments(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TaxonomyList>>> {
    let resp = catalog_service::flat_list(&state.pool, "customer_segments").await?;
    Ok(Json(resp))
}
