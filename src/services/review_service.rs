use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::reviews::{CreateReviewRequest, ReviewList},
    error::{AppError, AppResult, from_validation_errors},
    middleware::auth::AuthUser,
    models::{RatingSummary, Review},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    status::VendorStatus,
};

/// Submit a review for an approved vendor. Reviews land unapproved and show
/// publicly only after moderation; `is_verified` marks reviewers with a won
/// lead at the vendor, matched by the linked account or, for leads submitted
/// as a guest, by the account email.
pub async fn create_review(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    payload.validate().map_err(from_validation_errors)?;

    let vendor: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM vendors WHERE id = $1 AND status = $2")
            .bind(payload.vendor_id)
            .bind(VendorStatus::Approved.as_str())
            .fetch_optional(pool)
            .await?;
    if vendor.is_none() {
        return Err(AppError::BadRequest("Vendor not found".into()));
    }

    let is_verified: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM vendor_leads vl
            JOIN leads l ON l.id = vl.lead_id
            WHERE vl.vendor_id = $1
              AND vl.status = 'won'
              AND (l.customer_id = $2
                   OR l.customer_email = (SELECT email FROM users WHERE id = $2))
        )
        "#,
    )
    .bind(payload.vendor_id)
    .bind(user.user_id)
    .fetch_one(pool)
    .await?;

    let review: Review = sqlx::query_as(
        r#"
        INSERT INTO reviews (id, vendor_id, customer_id, rating, comment, is_verified)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.vendor_id)
    .bind(user.user_id)
    .bind(payload.rating)
    .bind(payload.comment)
    .bind(is_verified.0)
    .fetch_one(pool)
    .await?;

    log_audit(
        pool,
        Some(user.user_id),
        "review_create",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review.id, "vendor_id": review.vendor_id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Review submitted for moderation",
        review,
        Some(Meta::empty()),
    ))
}

/// Approved reviews for a public vendor page, newest first.
pub async fn list_vendor_reviews(
    pool: &DbPool,
    slug: &str,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    let vendor: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM vendors WHERE slug = $1 AND status = $2")
            .bind(slug)
            .bind(VendorStatus::Approved.as_str())
            .fetch_optional(pool)
            .await?;
    let vendor_id = match vendor {
        Some((id,)) => id,
        None => return Err(AppError::NotFound),
    };

    let (page, limit, offset) = pagination.normalize();
    let items: Vec<Review> = sqlx::query_as(
        r#"
        SELECT *
        FROM reviews
        WHERE vendor_id = $1 AND is_approved
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(vendor_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let summary: RatingSummary = sqlx::query_as(
        r#"
        SELECT AVG(rating)::float8 AS rating_avg, COUNT(*) AS review_count
        FROM reviews
        WHERE vendor_id = $1 AND is_approved
        "#,
    )
    .bind(vendor_id)
    .fetch_one(pool)
    .await?;

    let meta = Meta::new(page, limit, summary.review_count);
    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(meta),
    ))
}
