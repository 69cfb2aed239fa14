pub mod admin_service;
pub mod auth_service;
pub mod catalog_service;
pub mod favorite_service;
pub mod lead_service;
pub mod quote_service;
pub mod review_service;
pub mod search_service;
pub mod vendor_service;
