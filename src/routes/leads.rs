use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::leads::{CreateLeadRequest, LeadCreated},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::lead_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_lead))
}

#[utoipa::path(
    post,
    path = "/api/leads",
    request_body = CreateLeadRequest,
    responses(
        (status = 201, description = "Lead submitted", body = ApiResponse<LeadCreated>),
        (status = 400, description = "Anti-automation verification failed"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "Leads"
)]
pub async fn submit_lead(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(payload): Json<CreateLeadRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<LeadCreated>>)> {
    let resp = lead_service::submit_lead(&state, user.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
