use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::vendors::SearchResults,
    response::{ApiResponse, Meta},
    routes::params::{VendorSearchQuery, VendorSortBy, csv_slugs},
    state::AppState,
};

/// Fixed page size of the public vendor listing.
pub const SEARCH_PAGE_SIZE: i64 = 12;

/// Shared SELECT for denormalized vendor cards: display names, the primary
/// image (explicit primary first, then sort order, falling back to the
/// logo), and the approved-review aggregate.
pub const VENDOR_SUMMARY_SELECT: &str = r#"
    SELECT v.id, v.name, v.slug, v.description,
           c.name AS city_name, d.name AS district_name,
           v.avg_price_per_person, v.min_guest_count, v.max_guest_count,
           r.rating_avg, COALESCE(r.review_count, 0) AS review_count,
           COALESCE(img.image_url, v.logo_url) AS primary_image
    FROM vendors v
    JOIN cities c ON c.id = v.city_id
    LEFT JOIN districts d ON d.id = v.district_id
    LEFT JOIN (
        SELECT vendor_id, AVG(rating)::float8 AS rating_avg, COUNT(*) AS review_count
        FROM reviews
        WHERE is_approved
        GROUP BY vendor_id
    ) r ON r.vendor_id = v.id
    LEFT JOIN LATERAL (
        SELECT image_url
        FROM vendor_images vi
        WHERE vi.vendor_id = v.id
        ORDER BY vi.is_primary DESC, vi.sort_order ASC, vi.id ASC
        LIMIT 1
    ) img ON TRUE
"#;

pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 {
        0
    } else {
        (total_count + page_size - 1) / page_size
    }
}

/// Run the faceted vendor search. A storage failure degrades to an empty
/// result set so the listing page renders "no results" instead of an error.
pub async fn search_vendors(
    state: &AppState,
    query: VendorSearchQuery,
) -> ApiResponse<SearchResults> {
    let (page, page_size, offset) = query.pagination.normalize_or(SEARCH_PAGE_SIZE);

    match run_search(&state.pool, &query, page, page_size, offset).await {
        Ok(results) => {
            let meta = Meta::new(page, page_size, results.total_count);
            ApiResponse::success("Vendors", results, Some(meta))
        }
        Err(err) => {
            tracing::error!(error = %err, "vendor search failed, returning empty results");
            let meta = Meta::new(page, page_size, 0);
            ApiResponse::success("Vendors", SearchResults::empty(page, page_size), Some(meta))
        }
    }
}

/// Facet slugs resolved to ids before filtering. A slug list that resolves
/// to nothing still constrains the query (and matches no vendor).
struct ResolvedFacets {
    services: Option<Vec<Uuid>>,
    cuisines: Option<Vec<Uuid>>,
    delivery_models: Option<Vec<Uuid>>,
    tags: Option<Vec<Uuid>>,
}

async fn run_search(
    pool: &DbPool,
    query: &VendorSearchQuery,
    page: i64,
    page_size: i64,
    offset: i64,
) -> Result<SearchResults, sqlx::Error> {
    let facets = resolve_facets(pool, query).await?;

    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM vendors v WHERE v.status = 'approved'");
    push_filters(&mut count_qb, query, &facets);
    let total_count: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(VENDOR_SUMMARY_SELECT);
    qb.push(" WHERE v.status = 'approved'");
    push_filters(&mut qb, query, &facets);

    // Deterministic tie-break by vendor id keeps pagination stable across
    // requests with equal sort keys.
    match query.sort.unwrap_or_default() {
        VendorSortBy::Rating => qb.push(" ORDER BY COALESCE(r.rating_avg, 0) DESC, v.id ASC"),
        VendorSortBy::Price => qb.push(" ORDER BY v.avg_price_per_person ASC NULLS LAST, v.id ASC"),
        VendorSortBy::Newest => qb.push(" ORDER BY v.created_at DESC, v.id ASC"),
    };

    qb.push(" LIMIT ");
    qb.push_bind(page_size);
    qb.push(" OFFSET ");
    qb.push_bind(offset);

    let items = qb.build_query_as().fetch_all(pool).await?;

    Ok(SearchResults {
        items,
        total_count,
        page,
        page_size,
        total_pages: total_pages(total_count, page_size),
    })
}

async fn resolve_facets(
    pool: &DbPool,
    query: &VendorSearchQuery,
) -> Result<ResolvedFacets, sqlx::Error> {
    Ok(ResolvedFacets {
        services: resolve_slugs(pool, "services", csv_slugs(&query.services)).await?,
        cuisines: resolve_slugs(pool, "cuisine_types", csv_slugs(&query.cuisines)).await?,
        delivery_models: resolve_slugs(pool, "delivery_models", csv_slugs(&query.delivery_models))
            .await?,
        tags: resolve_slugs(pool, "tags", csv_slugs(&query.tags)).await?,
    })
}

/// Resolve taxonomy slugs to ids. Unknown slugs resolve to nothing, so a
/// filter made only of unknown slugs matches no vendor. `table` is a fixed
/// table name supplied by this module, never caller input.
async fn resolve_slugs(
    pool: &DbPool,
    table: &str,
    slugs: Vec<String>,
) -> Result<Option<Vec<Uuid>>, sqlx::Error> {
    if slugs.is_empty() {
        return Ok(None);
    }
    let sql = format!("SELECT id FROM {table} WHERE slug = ANY($1)");
    let ids: Vec<(Uuid,)> = sqlx::query_as(&sql).bind(&slugs).fetch_all(pool).await?;
    Ok(Some(ids.into_iter().map(|(id,)| id).collect()))
}

/// Append the optional filters. AND across filters, OR within a facet's id
/// list (membership via `= ANY`).
fn push_filters(
    qb: &mut QueryBuilder<Postgres>,
    query: &VendorSearchQuery,
    facets: &ResolvedFacets,
) {
    if let Some(city) = query.city {
        qb.push(" AND v.city_id = ");
        qb.push_bind(city);
    }
    if let Some(district) = query.district {
        qb.push(" AND v.district_id = ");
        qb.push_bind(district);
    }
    if let Some(min_price) = query.min_price {
        qb.push(" AND v.avg_price_per_person >= ");
        qb.push_bind(min_price);
    }
    if let Some(max_price) = query.max_price {
        qb.push(" AND v.avg_price_per_person <= ");
        qb.push_bind(max_price);
    }
    // NULL capacity bounds read as unbounded: a vendor without a stated
    // maximum is assumed to serve any party size.
    if let Some(min_guest) = query.min_guest {
        qb.push(" AND (v.max_guest_count IS NULL OR v.max_guest_count >= ");
        qb.push_bind(min_guest);
        qb.push(")");
    }
    if let Some(max_guest) = query.max_guest {
        qb.push(" AND (v.min_guest_count IS NULL OR v.min_guest_count <= ");
        qb.push_bind(max_guest);
        qb.push(")");
    }
    if let Some(category) = query.category {
        qb.push(" AND EXISTS (SELECT 1 FROM vendor_categories vc WHERE vc.vendor_id = v.id AND vc.category_id = ");
        qb.push_bind(category);
        qb.push(")");
    }
    if let Some(segment) = query.segment {
        qb.push(" AND EXISTS (SELECT 1 FROM vendor_segments vsg WHERE vsg.vendor_id = v.id AND vsg.segment_id = ");
        qb.push_bind(segment);
        qb.push(")");
    }
    if let Some(ids) = &facets.services {
        qb.push(" AND EXISTS (SELECT 1 FROM vendor_services vs WHERE vs.vendor_id = v.id AND vs.service_id = ANY(");
        qb.push_bind(ids.clone());
        qb.push("))");
    }
    if let Some(ids) = &facets.cuisines {
        qb.push(" AND EXISTS (SELECT 1 FROM vendor_cuisines vcu WHERE vcu.vendor_id = v.id AND vcu.cuisine_id = ANY(");
        qb.push_bind(ids.clone());
        qb.push("))");
    }
    if let Some(ids) = &facets.delivery_models {
        qb.push(" AND EXISTS (SELECT 1 FROM vendor_delivery_models vdm WHERE vdm.vendor_id = v.id AND vdm.delivery_model_id = ANY(");
        qb.push_bind(ids.clone());
        qb.push("))");
    }
    if let Some(ids) = &facets.tags {
        qb.push(" AND EXISTS (SELECT 1 FROM vendor_tags vt WHERE vt.vendor_id = v.id AND vt.tag_id = ANY(");
        qb.push_bind(ids.clone());
        qb.push("))");
    }

    // Amenity checkboxes constrain only when set; an unchecked box is not a
    // negative filter.
    let amenities: [(&str, Option<bool>); 7] = [
        ("v.is_open_24_7", query.open_24_7),
        ("v.has_refrigerated_transport", query.refrigerated_transport),
        ("v.is_halal_certified", query.halal),
        ("v.offers_free_tasting", query.free_tasting),
        ("v.offers_free_delivery", query.free_delivery),
        ("v.accepts_last_minute", query.last_minute),
        ("v.serves_outside_city", query.outside_city),
    ];
    for (column, value) in amenities {
        if value == Some(true) {
            qb.push(" AND ");
            qb.push(column);
            qb.push(" = TRUE");
        }
    }

    if let Some(q) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{q}%");
        qb.push(" AND (v.name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR v.description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(25, 12), 3);
        assert_eq!(total_pages(-3, 12), 0);
    }
}
