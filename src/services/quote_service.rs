use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::log_audit,
    dto::{
        leads::{VendorLeadList, VendorLeadWithLead},
        quotes::{CreateQuoteRequest, QuoteAccessRequest, QuoteAction, QuoteWithLeadStatus, RespondQuoteRequest},
    },
    entity::{
        leads::{Entity as Leads, Model as LeadModel},
        quotes::{ActiveModel as QuoteActive, Column as QuoteCol, Entity as Quotes, Model as QuoteModel},
        vendor_leads::{
            ActiveModel as VendorLeadActive, Column as VlCol, Entity as VendorLeads,
            Model as VendorLeadModel,
        },
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::AuthUser,
    models::{Lead, Quote, VendorLead},
    notify::{self, Notification},
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, VendorLeadListQuery},
    services::vendor_service::vendor_for_owner,
    state::AppState,
    status::{QuoteStatus, VendorLeadStatus},
};

/// The vendor's lead inbox: tracking row, the request itself and the active
/// quote when one is out, newest first.
pub async fn list_vendor_leads(
    state: &AppState,
    user: &AuthUser,
    query: VendorLeadListQuery,
) -> AppResult<ApiResponse<VendorLeadList>> {
    let vendor = vendor_for_owner(state, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all().add(VlCol::VendorId.eq(vendor.id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status: VendorLeadStatus = status
            .parse()
            .map_err(|e: String| AppError::BadRequest(e))?;
        condition = condition.add(VlCol::Status.eq(status.as_str()));
    }

    let mut finder = VendorLeads::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(VlCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(VlCol::CreatedAt),
    };
    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .find_also_related(Leads)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let now = Utc::now();
    let mut items = Vec::with_capacity(rows.len());
    for (vl, lead) in rows {
        let lead = lead.ok_or(AppError::NotFound)?;
        let active_quote = active_quote_for(state, vl.id, now).await?;
        items.push(VendorLeadWithLead {
            vendor_lead: vendor_lead_view(&vl, active_quote.as_ref()),
            lead: lead_from_entity(lead),
            active_quote: active_quote.map(|q| quote_from_entity(q, now)),
        });
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Leads",
        VendorLeadList { items },
        Some(meta),
    ))
}

/// First vendor view flips `sent` to `seen`; re-viewing is a no-op.
pub async fn view_vendor_lead(
    state: &AppState,
    user: &AuthUser,
    vendor_lead_id: Uuid,
) -> AppResult<ApiResponse<VendorLead>> {
    let vendor = vendor_for_owner(state, user).await?;
    let vl = owned_vendor_lead(state, vendor.id, vendor_lead_id).await?;

    let status = parse_vendor_lead_status(&vl.status)?;
    let vl = if status == VendorLeadStatus::Sent {
        let now = Utc::now();
        let mut active: VendorLeadActive = vl.into();
        active.status = Set(VendorLeadStatus::Seen.as_str().to_string());
        active.viewed_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        active.update(&state.orm).await?
    } else {
        vl
    };

    Ok(ApiResponse::success(
        "Lead viewed",
        vendor_lead_from_entity(vl),
        Some(Meta::empty()),
    ))
}

/// Vendor marks the lead as contacted outside the platform.
pub async fn mark_contacted(
    state: &AppState,
    user: &AuthUser,
    vendor_lead_id: Uuid,
) -> AppResult<ApiResponse<VendorLead>> {
    let vendor = vendor_for_owner(state, user).await?;
    let vl = owned_vendor_lead(state, vendor.id, vendor_lead_id).await?;

    let status = parse_vendor_lead_status(&vl.status)?;
    if !matches!(status, VendorLeadStatus::Sent | VendorLeadStatus::Seen) {
        return Err(AppError::Conflict(format!(
            "lead cannot be marked contacted from status {status}"
        )));
    }

    let now = Utc::now();
    let mut active: VendorLeadActive = vl.into();
    active.status = Set(VendorLeadStatus::Contacted.as_str().to_string());
    if status == VendorLeadStatus::Sent {
        active.viewed_at = Set(Some(now.into()));
    }
    active.responded_at = Set(Some(now.into()));
    active.updated_at = Set(now.into());
    let vl = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Lead marked contacted",
        vendor_lead_from_entity(vl),
        Some(Meta::empty()),
    ))
}

/// Issue a quote against a vendor lead. Inserts directly in `sent`, flips
/// the lead to `quoted`, and notifies the customer after commit. At most one
/// active quote may exist per vendor lead.
pub async fn create_quote(
    state: &AppState,
    user: &AuthUser,
    vendor_lead_id: Uuid,
    payload: CreateQuoteRequest,
) -> AppResult<ApiResponse<QuoteWithLeadStatus>> {
    payload
        .validate()
        .map_err(crate::error::from_validation_errors)?;

    let now = Utc::now();
    if payload.valid_until <= now {
        return Err(AppError::Validation(vec![FieldError::new(
            "valid_until",
            "validity date must be in the future",
        )]));
    }

    let vendor = vendor_for_owner(state, user).await?;

    let txn = state.orm.begin().await?;

    let vl = VendorLeads::find()
        .filter(
            Condition::all()
                .add(VlCol::Id.eq(vendor_lead_id))
                .add(VlCol::VendorId.eq(vendor.id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let vl_status = parse_vendor_lead_status(&vl.status)?;
    if !vl_status.can_quote() {
        return Err(AppError::Conflict(format!(
            "cannot quote a lead in status {vl_status}"
        )));
    }

    // The status check already excludes `quoted`, but a stale row could
    // still carry an unresolved quote; the lock plus this scan closes the
    // race for the one-active-quote invariant.
    let existing = Quotes::find()
        .filter(QuoteCol::VendorLeadId.eq(vl.id))
        .all(&txn)
        .await?;
    for quote in &existing {
        let status = parse_quote_status(&quote.status)?;
        if status.is_active(quote.valid_until.with_timezone(&Utc), now) {
            return Err(AppError::Conflict("quote already sent for this lead".into()));
        }
    }

    let quote = QuoteActive {
        id: Set(Uuid::new_v4()),
        vendor_lead_id: Set(vl.id),
        total_price: Set(payload.total_price),
        price_per_person: Set(payload.price_per_person),
        message: Set(payload.message.clone()),
        valid_until: Set(payload.valid_until.into()),
        status: Set(QuoteStatus::Sent.as_str().to_string()),
        sent_at: Set(Some(now.into())),
        viewed_at: Set(None),
        responded_at: Set(None),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let lead_id = vl.lead_id;
    let mut vl_active: VendorLeadActive = vl.into();
    vl_active.status = Set(VendorLeadStatus::Quoted.as_str().to_string());
    vl_active.responded_at = Set(Some(now.into()));
    vl_active.updated_at = Set(now.into());
    let vl = vl_active.update(&txn).await?;

    // Customer contact is read before commit; once the quote is committed
    // nothing on the notification path can fail the request.
    let lead = Leads::find_by_id(lead_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    txn.commit().await?;

    notify::dispatch(
        &state.pool,
        Notification::to_email(
            lead.customer_email,
            "quote.sent",
            serde_json::json!({
                "quote_id": quote.id,
                "vendor_id": vendor.id,
                "vendor_name": vendor.name,
                "total_price": quote.total_price,
                "valid_until": payload.valid_until,
                "access_key": lead.access_key,
            }),
        ),
    );

    log_audit(
        &state.pool,
        Some(user.user_id),
        "quote_create",
        Some("quotes"),
        Some(serde_json::json!({ "quote_id": quote.id, "vendor_lead_id": vl.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Quote sent",
        QuoteWithLeadStatus {
            quote: quote_from_entity(quote, now),
            vendor_lead: vendor_lead_from_entity(vl),
        },
        Some(Meta::empty()),
    ))
}

/// Customer opens the quote link: `sent` flips to `viewed` once.
pub async fn view_quote(
    state: &AppState,
    quote_id: Uuid,
    payload: QuoteAccessRequest,
) -> AppResult<ApiResponse<Quote>> {
    let (quote, _vl, lead) = quote_with_lead(state, quote_id).await?;
    check_access_key(&lead, payload.access_key)?;

    let now = Utc::now();
    let status = parse_quote_status(&quote.status)?;
    let quote = if status.effective(quote.valid_until.with_timezone(&Utc), now)
        == QuoteStatus::Sent
    {
        let mut active: QuoteActive = quote.into();
        active.status = Set(QuoteStatus::Viewed.as_str().to_string());
        active.viewed_at = Set(Some(now.into()));
        active.update(&state.orm).await?
    } else {
        quote
    };

    Ok(ApiResponse::success(
        "Quote",
        quote_from_entity(quote, now),
        Some(Meta::empty()),
    ))
}

/// Customer accepts or rejects: resolves the quote and settles the parent
/// vendor lead to `won` or `lost` in the same transaction.
pub async fn respond_quote(
    state: &AppState,
    quote_id: Uuid,
    payload: RespondQuoteRequest,
) -> AppResult<ApiResponse<QuoteWithLeadStatus>> {
    let now = Utc::now();

    let txn = state.orm.begin().await?;

    let quote = Quotes::find_by_id(quote_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let vl = VendorLeads::find_by_id(quote.vendor_lead_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let lead = Leads::find_by_id(vl.lead_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    check_access_key(&lead, payload.access_key)?;

    let status = parse_quote_status(&quote.status)?;
    let valid_until = quote.valid_until.with_timezone(&Utc);
    if !status.can_respond(valid_until, now) {
        let effective = status.effective(valid_until, now);
        return Err(AppError::Conflict(format!(
            "quote can no longer be responded to (status {effective})"
        )));
    }

    let (quote_status, lead_status) = match payload.action {
        QuoteAction::Accept => (QuoteStatus::Accepted, VendorLeadStatus::Won),
        QuoteAction::Reject => (QuoteStatus::Rejected, VendorLeadStatus::Lost),
    };

    let mut quote_active: QuoteActive = quote.into();
    quote_active.status = Set(quote_status.as_str().to_string());
    quote_active.responded_at = Set(Some(now.into()));
    let quote = quote_active.update(&txn).await?;

    let vendor_id = vl.vendor_id;
    let mut vl_active: VendorLeadActive = vl.into();
    vl_active.status = Set(lead_status.as_str().to_string());
    vl_active.updated_at = Set(now.into());
    let vl = vl_active.update(&txn).await?;

    txn.commit().await?;

    notify_vendor_of_response(state, vendor_id, &quote, payload.action).await;

    Ok(ApiResponse::success(
        "Quote resolved",
        QuoteWithLeadStatus {
            quote: quote_from_entity(quote, now),
            vendor_lead: vendor_lead_from_entity(vl),
        },
        Some(Meta::empty()),
    ))
}

/// Vendor withdraws an unresolved quote. The lead drops back to `contacted`
/// so a corrected quote can follow.
pub async fn cancel_quote(
    state: &AppState,
    user: &AuthUser,
    quote_id: Uuid,
) -> AppResult<ApiResponse<QuoteWithLeadStatus>> {
    let vendor = vendor_for_owner(state, user).await?;
    let now = Utc::now();

    let txn = state.orm.begin().await?;

    let quote = Quotes::find_by_id(quote_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let vl = VendorLeads::find_by_id(quote.vendor_lead_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if vl.vendor_id != vendor.id {
        return Err(AppError::NotFound);
    }

    let status = parse_quote_status(&quote.status)?;
    if !matches!(status, QuoteStatus::Sent | QuoteStatus::Viewed) {
        return Err(AppError::Conflict(format!(
            "quote in status {status} cannot be cancelled"
        )));
    }

    let mut quote_active: QuoteActive = quote.into();
    quote_active.status = Set(QuoteStatus::Cancelled.as_str().to_string());
    quote_active.responded_at = Set(Some(now.into()));
    let quote = quote_active.update(&txn).await?;

    let mut vl_active: VendorLeadActive = vl.into();
    vl_active.status = Set(VendorLeadStatus::Contacted.as_str().to_string());
    vl_active.updated_at = Set(now.into());
    let vl = vl_active.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Quote cancelled",
        QuoteWithLeadStatus {
            quote: quote_from_entity(quote, now),
            vendor_lead: vendor_lead_from_entity(vl),
        },
        Some(Meta::empty()),
    ))
}

async fn notify_vendor_of_response(
    state: &AppState,
    vendor_id: Uuid,
    quote: &QuoteModel,
    action: QuoteAction,
) {
    let owner_id = match crate::entity::vendors::Entity::find_by_id(vendor_id)
        .one(&state.orm)
        .await
    {
        Ok(Some(vendor)) => vendor.owner_id,
        Ok(None) => return,
        Err(err) => {
            tracing::warn!(error = %err, "could not load vendor for notification");
            return;
        }
    };

    let event = match action {
        QuoteAction::Accept => "quote.accepted",
        QuoteAction::Reject => "quote.rejected",
    };
    notify::dispatch(
        &state.pool,
        Notification::to_user(
            owner_id,
            event,
            serde_json::json!({ "quote_id": quote.id, "total_price": quote.total_price }),
        ),
    );
}

async fn owned_vendor_lead(
    state: &AppState,
    vendor_id: Uuid,
    vendor_lead_id: Uuid,
) -> AppResult<VendorLeadModel> {
    VendorLeads::find()
        .filter(
            Condition::all()
                .add(VlCol::Id.eq(vendor_lead_id))
                .add(VlCol::VendorId.eq(vendor_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn quote_with_lead(
    state: &AppState,
    quote_id: Uuid,
) -> AppResult<(QuoteModel, VendorLeadModel, LeadModel)> {
    let quote = Quotes::find_by_id(quote_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let vl = VendorLeads::find_by_id(quote.vendor_lead_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let lead = Leads::find_by_id(vl.lead_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((quote, vl, lead))
}

/// The emailed link token is the only credential for customers without an
/// account; a mismatch reads as not-found to avoid leaking quote existence.
fn check_access_key(lead: &LeadModel, access_key: Uuid) -> AppResult<()> {
    if lead.access_key != access_key {
        return Err(AppError::NotFound);
    }
    Ok(())
}

async fn active_quote_for(
    state: &AppState,
    vendor_lead_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Option<QuoteModel>> {
    let quotes = Quotes::find()
        .filter(QuoteCol::VendorLeadId.eq(vendor_lead_id))
        .order_by_desc(QuoteCol::CreatedAt)
        .all(&state.orm)
        .await?;

    for quote in quotes {
        let status = parse_quote_status(&quote.status)?;
        if status.is_active(quote.valid_until.with_timezone(&Utc), now) {
            return Ok(Some(quote));
        }
    }
    Ok(None)
}

fn parse_vendor_lead_status(raw: &str) -> AppResult<VendorLeadStatus> {
    raw.parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))
}

fn parse_quote_status(raw: &str) -> AppResult<QuoteStatus> {
    raw.parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))
}

/// Present the derived tracking status: a `quoted` lead whose only quote has
/// expired unresponded reads as `lost` (never written back).
fn vendor_lead_view(vl: &VendorLeadModel, active_quote: Option<&QuoteModel>) -> VendorLead {
    let mut view = vendor_lead_from_entity(vl.clone());
    if view.status == VendorLeadStatus::Quoted.as_str() && active_quote.is_none() {
        view.status = VendorLeadStatus::Lost.as_str().to_string();
    }
    view
}

pub(crate) fn vendor_lead_from_entity(model: VendorLeadModel) -> VendorLead {
    VendorLead {
        id: model.id,
        vendor_id: model.vendor_id,
        lead_id: model.lead_id,
        status: model.status,
        viewed_at: model.viewed_at.map(|dt| dt.with_timezone(&Utc)),
        responded_at: model.responded_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn quote_from_entity(model: QuoteModel, now: DateTime<Utc>) -> Quote {
    let valid_until = model.valid_until.with_timezone(&Utc);
    let status = model
        .status
        .parse::<QuoteStatus>()
        .map(|s| s.effective(valid_until, now))
        .map(|s| s.as_str().to_string())
        .unwrap_or(model.status);
    Quote {
        id: model.id,
        vendor_lead_id: model.vendor_lead_id,
        total_price: model.total_price,
        price_per_person: model.price_per_person,
        message: model.message,
        valid_until,
        status,
        sent_at: model.sent_at.map(|dt| dt.with_timezone(&Utc)),
        viewed_at: model.viewed_at.map(|dt| dt.with_timezone(&Utc)),
        responded_at: model.responded_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn lead_from_entity(model: LeadModel) -> Lead {
    Lead {
        id: model.id,
        customer_id: model.customer_id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_phone: model.customer_phone,
        segment_id: model.segment_id,
        event_type: model.event_type,
        event_date: model.event_date,
        guest_count: model.guest_count,
        budget_min: model.budget_min,
        budget_max: model.budget_max,
        service_style: model.service_style,
        needs_waitstaff: model.needs_waitstaff,
        needs_tableware: model.needs_tableware,
        needs_setup: model.needs_setup,
        cuisine_preference: model.cuisine_preference,
        delivery_model: model.delivery_model,
        dietary_requirements: model.dietary_requirements,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
