use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        self.normalize_or(20)
    }

    /// Normalize with a surface-specific default page size (the vendor
    /// listing pages by 12).
    pub fn normalize_or(&self, default_per_page: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VendorSortBy {
    #[default]
    Rating,
    Price,
    Newest,
}

/// URL query surface of the search engine; parameters map 1:1 to filter
/// fields. Multi-valued facets arrive as comma lists of slugs and are
/// resolved to ids server-side.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VendorSearchQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub city: Option<Uuid>,
    pub district: Option<Uuid>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_guest: Option<i32>,
    pub max_guest: Option<i32>,
    pub category: Option<Uuid>,
    pub segment: Option<Uuid>,
    pub services: Option<String>,
    pub cuisines: Option<String>,
    pub delivery_models: Option<String>,
    pub tags: Option<String>,
    pub open_24_7: Option<bool>,
    pub refrigerated_transport: Option<bool>,
    pub halal: Option<bool>,
    pub free_tasting: Option<bool>,
    pub free_delivery: Option<bool>,
    pub last_minute: Option<bool>,
    pub outside_city: Option<bool>,
    pub q: Option<String>,
    pub sort: Option<VendorSortBy>,
}

/// Split a comma list parameter into trimmed, non-empty slugs.
pub fn csv_slugs(param: &Option<String>) -> Vec<String> {
    param
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VendorLeadListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_normalizes_defaults_and_bounds() {
        let p = Pagination {
            page: None,
            per_page: None,
        };
        assert_eq!(p.normalize(), (1, 20, 0));
        assert_eq!(p.normalize_or(12), (1, 12, 0));

        let p = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: Some(12),
        };
        assert_eq!(p.normalize_or(12), (3, 12, 24));
    }

    #[test]
    fn csv_slugs_trims_and_drops_empties() {
        assert_eq!(
            csv_slugs(&Some("wedding, corporate ,,bbq".into())),
            vec!["wedding", "corporate", "bbq"]
        );
        assert!(csv_slugs(&Some("  ".into())).is_empty());
        assert!(csv_slugs(&None).is_empty());
    }
}
