use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod leads;
pub mod params;
pub mod quotes;
pub mod reviews;
pub mod vendor_portal;
pub mod vendors;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/catalog", catalog::router())
        .nest("/vendors", vendors::router())
        .nest("/leads", leads::router())
        .nest("/quotes", quotes::router())
        .nest("/vendor", vendor_portal::router())
        .nest("/reviews", reviews::router())
        .nest("/favorites", favorites::router())
        .nest("/admin", admin::router())
}
