use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        catalog::{CityWithDistricts, ServiceGroupWithServices, TagGroupWithTags, TaxonomyList},
        favorites::{FavoriteVendorList, ToggleFavoriteRequest, ToggleFavoriteResult},
        leads::{CreateLeadRequest, LeadCreated, UpdateLeadNotesRequest, VendorLeadList, VendorLeadWithLead},
        quotes::{CreateQuoteRequest, QuoteAccessRequest, QuoteWithLeadStatus, RespondQuoteRequest},
        reviews::{CreateReviewRequest, ReviewList},
        vendors::{
            PackageList, PackageRequest, SearchResults, UpdateVendorProfileRequest,
            VendorApplicationRequest, VendorDetail,
        },
    },
    models::{
        Favorite, Lead, Quote, RatingSummary, Review, TaxonomyItem, User, Vendor, VendorImage,
        VendorLead, VendorPackage, VendorSummary,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, catalog, favorites, health, leads, params, quotes, reviews, vendor_portal, vendors},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        catalog::list_cities,
        catalog::list_categories,
        catalog::list_services,
        catalog::list_cuisines,
        catalog::list_delivery_models,
        catalog::list_tags,
        catalog::list_segments,
        vendors::search_vendors,
        vendors::get_vendor,
        vendors::list_vendor_reviews,
        leads::submit_lead,
        quotes::view_quote,
        quotes::respond_quote,
        vendor_portal::apply,
        vendor_portal::get_profile,
        vendor_portal::update_profile,
        vendor_portal::list_leads,
        vendor_portal::view_lead,
        vendor_portal::mark_contacted,
        vendor_portal::create_quote,
        vendor_portal::cancel_quote,
        vendor_portal::list_packages,
        vendor_portal::create_package,
        vendor_portal::update_package,
        vendor_portal::delete_package,
        reviews::create_review,
        favorites::list_favorites,
        favorites::toggle_favorite,
        admin::list_vendors,
        admin::update_vendor_status,
        admin::list_pending_reviews,
        admin::moderate_review,
        admin::update_lead_notes
    ),
    components(
        schemas(
            User,
            TaxonomyItem,
            Vendor,
            VendorImage,
            VendorPackage,
            VendorSummary,
            Lead,
            VendorLead,
            Quote,
            Review,
            Favorite,
            RatingSummary,
            CityWithDistricts,
            ServiceGroupWithServices,
            TagGroupWithTags,
            TaxonomyList,
            SearchResults,
            VendorDetail,
            VendorApplicationRequest,
            UpdateVendorProfileRequest,
            PackageRequest,
            PackageList,
            CreateLeadRequest,
            LeadCreated,
            UpdateLeadNotesRequest,
            VendorLeadWithLead,
            VendorLeadList,
            CreateQuoteRequest,
            QuoteAccessRequest,
            RespondQuoteRequest,
            QuoteWithLeadStatus,
            CreateReviewRequest,
            ReviewList,
            ToggleFavoriteRequest,
            ToggleFavoriteResult,
            FavoriteVendorList,
            admin::VendorListQuery,
            admin::UpdateVendorStatusRequest,
            admin::ModerateReviewRequest,
            admin::VendorList,
            params::Pagination,
            params::VendorSearchQuery,
            params::VendorLeadListQuery,
            Meta,
            ApiResponse<Vendor>,
            ApiResponse<VendorDetail>,
            ApiResponse<SearchResults>,
            ApiResponse<LeadCreated>,
            ApiResponse<VendorLeadList>,
            ApiResponse<QuoteWithLeadStatus>,
            ApiResponse<ReviewList>,
            ApiResponse<FavoriteVendorList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Catalog", description = "Taxonomy reference data"),
        (name = "Vendors", description = "Public vendor search and detail"),
        (name = "Leads", description = "Public lead submission"),
        (name = "Quotes", description = "Customer-side quote actions"),
        (name = "Vendor portal", description = "Vendor owner surface"),
        (name = "Reviews", description = "Review submission"),
        (name = "Favorites", description = "Saved vendors"),
        (name = "Admin", description = "Moderation endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
