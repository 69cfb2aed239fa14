use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::quotes::{QuoteAccessRequest, QuoteWithLeadStatus, RespondQuoteRequest},
    error::AppResult,
    models::Quote,
    response::ApiResponse,
    services::quote_service,
    state::AppState,
};

// Customer-side quote actions, authorized by the lead's access key rather
// than a session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/view", post(view_quote))
        .route("/{id}/respond", post(respond_quote))
}

#[utoipa::path(
    post,
    path = "/api/quotes/{id}/view",
    params(("id" = Uuid, Path, description = "Quote ID")),
    request_body = QuoteAccessRequest,
    responses(
        (status = 200, description = "Quote for the customer", body = ApiResponse<Quote>),
        (status = 404, description = "Unknown quote or wrong access key"),
    ),
    tag = "Quotes"
)]
pub async fn view_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuoteAccessRequest>,
) -> AppResult<Json<ApiResponse<Quote>>> {
    let resp = quote_service::view_quote(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/quotes/{id}/respond",
    params(("id" = Uuid, Path, description = "Quote ID")),
    request_body = RespondQuoteRequest,
    responses(
        (status = 200, description = "Quote accepted or rejected", body = ApiResponse<QuoteWithLeadStatus>),
        (status = 404, description = "Unknown quote or wrong access key"),
        (status = 409, description = "Quote is no longer open"),
    ),
    tag = "Quotes"
)]
pub async fn respond_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondQuoteRequest>,
) -> AppResult<Json<ApiResponse<QuoteWithLeadStatus>>> {
    let resp = quote_service::respond_quote(&state, id, payload).await?;
    Ok(Json(resp))
}
