pub mod favorites;
pub mod leads;
pub mod quotes;
pub mod reviews;
pub mod users;
pub mod vendor_images;
pub mod vendor_leads;
pub mod vendor_links;
pub mod vendor_packages;
pub mod vendors;
