use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::leads::{CreateLeadRequest, LeadCreated},
    entity::{
        leads::{ActiveModel as LeadActive, Column as LeadCol, Entity as Leads},
        vendor_leads::{ActiveModel as VendorLeadActive, Column as VlCol, Entity as VendorLeads},
        vendors::Entity as Vendors,
    },
    error::{AppError, AppResult, FieldError, from_validation_errors},
    middleware::auth::AuthUser,
    notify::{self, Notification},
    response::{ApiResponse, Meta},
    state::AppState,
    status::{VendorLeadStatus, VendorStatus},
};

/// Accept a public lead submission: validate, verify the anti-automation
/// token, persist the Lead plus its VendorLead fan-out row atomically, then
/// notify the vendor best-effort. A signed-in submitter is linked to the
/// lead so a later review can be marked verified.
pub async fn submit_lead(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: CreateLeadRequest,
) -> AppResult<ApiResponse<LeadCreated>> {
    payload.validate().map_err(from_validation_errors)?;

    let field_errors = validate_event_fields(
        payload.event_date,
        payload.guest_count,
        payload.budget_min,
        payload.budget_max,
        Utc::now().date_naive(),
    );
    if !field_errors.is_empty() {
        return Err(AppError::Validation(field_errors));
    }

    verify_proof_token(&payload.anti_automation_token)?;

    // A retried submission with the same key returns the original result
    // instead of fanning out twice.
    if let Some(existing) = find_by_idempotency_key(state, &payload.idempotency_key).await? {
        return Ok(ApiResponse::success(
            "Lead already submitted",
            existing,
            Some(Meta::empty()),
        ));
    }

    let vendor = Vendors::find_by_id(payload.vendor_id)
        .one(&state.orm)
        .await?;
    let vendor = match vendor {
        Some(v) if v.status == VendorStatus::Approved.as_str() => v,
        _ => {
            return Err(AppError::Validation(vec![FieldError::new(
                "vendorId",
                "unknown or unavailable vendor",
            )]));
        }
    };

    let lead_id = Uuid::new_v4();
    let vendor_lead_id = Uuid::new_v4();
    let access_key = Uuid::new_v4();

    let insert = async {
        let txn = state.orm.begin().await?;

        LeadActive {
            id: Set(lead_id),
            customer_id: Set(user.map(|u| u.user_id)),
            customer_name: Set(payload.customer_name.clone()),
            customer_email: Set(payload.customer_email.clone()),
            customer_phone: Set(payload.customer_phone.clone()),
            segment_id: Set(payload.segment_id),
            event_type: Set(payload.event_type.clone()),
            event_date: Set(payload.event_date),
            guest_count: Set(payload.guest_count),
            budget_min: Set(payload.budget_min),
            budget_max: Set(payload.budget_max),
            service_style: Set(payload.service_style.clone()),
            needs_waitstaff: Set(payload.needs_waitstaff),
            needs_tableware: Set(payload.needs_tableware),
            needs_setup: Set(payload.needs_setup),
            cuisine_preference: Set(payload.cuisine_preference.clone()),
            delivery_model: Set(payload.delivery_model.clone()),
            dietary_requirements: Set(payload.dietary_requirements.clone()),
            notes: Set(payload.notes.clone()),
            internal_notes: Set(None),
            idempotency_key: Set(payload.idempotency_key.clone()),
            access_key: Set(access_key),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        VendorLeadActive {
            id: Set(vendor_lead_id),
            vendor_id: Set(vendor.id),
            lead_id: Set(lead_id),
            status: Set(VendorLeadStatus::Sent.as_str().to_string()),
            viewed_at: Set(None),
            responded_at: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok::<(), sea_orm::DbErr>(())
    };

    if let Err(err) = insert.await {
        // A concurrent retry may have won the unique idempotency-key race;
        // in that case hand back its identifiers.
        if let Some(existing) = find_by_idempotency_key(state, &payload.idempotency_key).await? {
            return Ok(ApiResponse::success(
                "Lead already submitted",
                existing,
                Some(Meta::empty()),
            ));
        }
        return Err(err.into());
    }

    notify::dispatch(
        &state.pool,
        Notification::to_user(
            vendor.owner_id,
            "lead.received",
            serde_json::json!({
                "lead_id": lead_id,
                "vendor_lead_id": vendor_lead_id,
                "vendor_id": vendor.id,
                "customer_name": payload.customer_name,
                "event_date": payload.event_date,
                "guest_count": payload.guest_count,
            }),
        ),
    );

    Ok(ApiResponse::success(
        "Lead submitted",
        LeadCreated {
            lead_id,
            vendor_lead_id,
        },
        Some(Meta::empty()),
    ))
}

async fn find_by_idempotency_key(
    state: &AppState,
    key: &str,
) -> AppResult<Option<LeadCreated>> {
    let lead = Leads::find()
        .filter(LeadCol::IdempotencyKey.eq(key))
        .one(&state.orm)
        .await?;
    let lead = match lead {
        Some(l) => l,
        None => return Ok(None),
    };

    let vendor_lead = VendorLeads::find()
        .filter(VlCol::LeadId.eq(lead.id))
        .one(&state.orm)
        .await?;
    let vendor_lead = match vendor_lead {
        Some(vl) => vl,
        None => return Ok(None),
    };

    Ok(Some(LeadCreated {
        lead_id: lead.id,
        vendor_lead_id: vendor_lead.id,
    }))
}

/// Server-side check of the anti-automation proof issued by the challenge
/// provider embedded in the lead form. The provider seam is a shared secret
/// comparison here; the dedicated error keeps bot rejections distinguishable
/// from field validation.
fn verify_proof_token(token: &str) -> AppResult<()> {
    let secret = std::env::var("LEAD_PROOF_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("LEAD_PROOF_SECRET is not set")))?;
    if token.is_empty() || token != secret {
        return Err(AppError::BadRequest(
            "anti-automation verification failed".into(),
        ));
    }
    Ok(())
}

/// Field checks that depend on "today" or on field combinations; the
/// declarative derive covers the rest.
fn validate_event_fields(
    event_date: Option<NaiveDate>,
    guest_count: Option<i32>,
    budget_min: Option<i64>,
    budget_max: Option<i64>,
    today: NaiveDate,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(date) = event_date {
        if date < today {
            errors.push(FieldError::new("eventDate", "event date must not be in the past"));
        }
    }
    if let Some(count) = guest_count {
        if count <= 0 {
            errors.push(FieldError::new("guestCount", "guest count must be a positive integer"));
        }
    }
    if let (Some(min), Some(max)) = (budget_min, budget_max) {
        if min > max {
            errors.push(FieldError::new("budgetMax", "maximum budget is below the minimum"));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn rejects_past_event_date() {
        let today = Utc::now().date_naive();
        let errors = validate_event_fields(Some(today - Duration::days(1)), None, None, None, today);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "eventDate");
    }

    #[test]
    fn accepts_today_and_future_dates() {
        let today = Utc::now().date_naive();
        assert!(validate_event_fields(Some(today), Some(50), None, None, today).is_empty());
        assert!(
            validate_event_fields(Some(today + Duration::days(30)), None, None, None, today)
                .is_empty()
        );
    }

    #[test]
    fn rejects_non_positive_guest_count_and_inverted_budget() {
        let today = Utc::now().date_naive();
        let errors = validate_event_fields(None, Some(0), Some(5000), Some(1000), today);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"guestCount"));
        assert!(fields.contains(&"budgetMax"));
    }
}
