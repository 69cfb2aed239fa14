use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::leads::UpdateLeadNotesRequest,
    dto::reviews::ReviewList,
    entity::vendors::{ActiveModel as VendorActive, Column as VendorCol, Entity as Vendors},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Review, Vendor},
    notify::{self, Notification},
    response::{ApiResponse, Meta},
    routes::admin::{ModerateReviewRequest, UpdateVendorStatusRequest, VendorList, VendorListQuery},
    routes::params::Pagination,
    services::vendor_service::vendor_from_entity,
    state::AppState,
    status::VendorStatus,
};

pub async fn list_vendors(
    state: &AppState,
    user: &AuthUser,
    query: VendorListQuery,
) -> AppResult<ApiResponse<VendorList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status: VendorStatus = status
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid vendor status".into()))?;
        condition = condition.add(VendorCol::Status.eq(status.as_str()));
    }

    let finder = Vendors::find()
        .filter(condition)
        .order_by_desc(VendorCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(vendor_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Vendors",
        VendorList { items },
        Some(meta),
    ))
}

/// Moderate a vendor application or an existing profile. The owner is told
/// about every status change.
pub async fn update_vendor_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateVendorStatusRequest,
) -> AppResult<ApiResponse<Vendor>> {
    ensure_admin(user)?;
    let status: VendorStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid vendor status".into()))?;

    let existing = Vendors::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(v) => v,
        None => return Err(AppError::NotFound),
    };
    let owner_id = existing.owner_id;

    let mut active: VendorActive = existing.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let vendor = active.update(&state.orm).await?;

    notify::dispatch(
        &state.pool,
        Notification::to_user(
            owner_id,
            "vendor.status_changed",
            serde_json::json!({ "vendor_id": vendor.id, "status": vendor.status }),
        ),
    );

    log_audit(
        &state.pool,
        Some(user.user_id),
        "vendor_status_update",
        Some("vendors"),
        Some(serde_json::json!({ "vendor_id": vendor.id, "status": vendor.status })),
    )
    .await;

    Ok(ApiResponse::success(
        "Vendor updated",
        vendor_from_entity(vendor),
        Some(Meta::empty()),
    ))
}

/// Review moderation queue: everything not yet approved, oldest first.
pub async fn list_pending_reviews(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let items: Vec<Review> = sqlx::query_as(
        r#"
        SELECT *
        FROM reviews
        WHERE NOT is_approved
        ORDER BY created_at ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE NOT is_approved")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Pending reviews",
        ReviewList { items },
        Some(meta),
    ))
}

/// Approve a review into the public set, or reject it, which deletes the
/// row so it never counts against the vendor's aggregate.
pub async fn moderate_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ModerateReviewRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let (action, result) = if payload.approve {
        let result = sqlx::query("UPDATE reviews SET is_approved = TRUE WHERE id = $1")
            .bind(id)
            .execute(&state.pool)
            .await?;
        ("review_approve", result)
    } else {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&state.pool)
            .await?;
        ("review_reject", result)
    };

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    log_audit(
        &state.pool,
        Some(user.user_id),
        action,
        Some("reviews"),
        Some(serde_json::json!({ "review_id": id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Review moderated",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Internal notes are the only lead field that changes after submission;
/// everything the customer entered stays as submitted.
pub async fn update_lead_notes(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateLeadNotesRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = sqlx::query("UPDATE leads SET internal_notes = $1 WHERE id = $2")
        .bind(&payload.internal_notes)
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    log_audit(
        &state.pool,
        Some(user.user_id),
        "lead_notes_update",
        Some("leads"),
        Some(serde_json::json!({ "lead_id": id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Lead notes updated",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
