pub mod auth;
pub mod catalog;
pub mod favorites;
pub mod leads;
pub mod quotes;
pub mod reviews;
pub mod vendors;
