use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::favorites::{FavoriteVendorList, ToggleFavoriteRequest, ToggleFavoriteResult},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::VendorSummary,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::search_service::VENDOR_SUMMARY_SELECT,
    status::VendorStatus,
};

/// Saved vendors, newest first, rendered as the same denormalized cards the
/// search listing uses.
pub async fn list_favorites(
    pool: &DbPool,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteVendorList>> {
    let (page, limit, offset) = pagination.normalize();

    let sql = format!(
        "{VENDOR_SUMMARY_SELECT} \
         JOIN favorites f ON f.vendor_id = v.id \
         WHERE f.user_id = $1 AND v.status = 'approved' \
         ORDER BY f.created_at DESC \
         LIMIT $2 OFFSET $3"
    );
    let items: Vec<VendorSummary> = sqlx::query_as(&sql)
        .bind(user.user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Favorites",
        FavoriteVendorList { items },
        Some(meta),
    ))
}

/// Toggle a vendor in the user's favorites: remove when present, add when
/// absent. The response carries the end state so a stale client converges.
pub async fn toggle_favorite(
    pool: &DbPool,
    user: &AuthUser,
    payload: ToggleFavoriteRequest,
) -> AppResult<ApiResponse<ToggleFavoriteResult>> {
    let vendor: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM vendors WHERE id = $1 AND status = $2")
            .bind(payload.vendor_id)
            .bind(VendorStatus::Approved.as_str())
            .fetch_optional(pool)
            .await?;
    if vendor.is_none() {
        return Err(AppError::BadRequest("Vendor not found".into()));
    }

    let deleted = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND vendor_id = $2")
        .bind(user.user_id)
        .bind(payload.vendor_id)
        .execute(pool)
        .await?;

    let favorited = if deleted.rows_affected() > 0 {
        false
    } else {
        // The unique pair constraint makes a concurrent double-toggle settle
        // on a single row.
        sqlx::query(
            r#"
            INSERT INTO favorites (id, user_id, vendor_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, vendor_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.user_id)
        .bind(payload.vendor_id)
        .execute(pool)
        .await?;
        true
    };

    log_audit(
        pool,
        Some(user.user_id),
        if favorited {
            "favorite_add"
        } else {
            "favorite_remove"
        },
        Some("favorites"),
        Some(serde_json::json!({ "vendor_id": payload.vendor_id })),
    )
    .await;

    Ok(ApiResponse::success(
        if favorited {
            "Added to favorites"
        } else {
            "Removed from favorites"
        },
        ToggleFavoriteResult { favorited },
        Some(Meta::empty()),
    ))
}
