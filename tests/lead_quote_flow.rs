use axum_catering_api::{
    db::{create_orm_conn, create_pool},
    dto::leads::CreateLeadRequest,
    dto::quotes::{CreateQuoteRequest, QuoteAccessRequest, QuoteAction, RespondQuoteRequest},
    dto::reviews::CreateReviewRequest,
    entity::{users::ActiveModel as UserActive, vendors::ActiveModel as VendorActive},
    error::AppError,
    middleware::auth::AuthUser,
    services::{lead_service, quote_service, review_service},
    state::AppState,
};
use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

const PROOF_SECRET: &str = "test-proof-secret";

// Integration flow: customer submits a lead -> vendor views and quotes ->
// customer accepts via the emailed access key.
#[tokio::test]
async fn lead_to_accepted_quote_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };
    unsafe {
        std::env::set_var("LEAD_PROOF_SECRET", PROOF_SECRET);
    }

    let state = setup_state(&database_url).await?;

    let owner_id = create_user(&state, "vendor_owner", "owner@example.com").await?;
    let vendor_id = create_approved_vendor(&state, owner_id).await?;
    let auth_owner = AuthUser {
        user_id: owner_id,
        role: "vendor_owner".into(),
    };
    // The customer account shares the email the guest lead is submitted with
    let customer_id = create_user(&state, "customer", "ada@example.com").await?;
    let auth_customer = AuthUser {
        user_id: customer_id,
        role: "customer".into(),
    };

    // Rejected submissions first: bad proof token, past event date, unknown vendor
    let mut bad_token = lead_request(vendor_id, "key-bad-token");
    bad_token.anti_automation_token = "wrong".into();
    let result = lead_service::submit_lead(&state, None, bad_token).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut past_date = lead_request(vendor_id, "key-past-date");
    past_date.event_date = Some(Utc::now().date_naive() - Duration::days(2));
    let result = lead_service::submit_lead(&state, None, past_date).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result =
        lead_service::submit_lead(&state, None, lead_request(Uuid::new_v4(), "key-no-vendor"))
            .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // Submit a lead as a guest, without a bearer token
    let created = lead_service::submit_lead(&state, None, lead_request(vendor_id, "key-1"))
        .await?
        .data
        .unwrap();

    // A retry with the same idempotency key returns the original identifiers
    let retried = lead_service::submit_lead(&state, None, lead_request(vendor_id, "key-1"))
        .await?
        .data
        .unwrap();
    assert_eq!(retried.lead_id, created.lead_id);
    assert_eq!(retried.vendor_lead_id, created.vendor_lead_id);

    // Vendor opens the lead: sent -> seen, and viewing again stays seen
    let viewed = quote_service::view_vendor_lead(&state, &auth_owner, created.vendor_lead_id)
        .await?
        .data
        .unwrap();
    assert_eq!(viewed.status, "seen");
    assert!(viewed.viewed_at.is_some());
    let viewed_again = quote_service::view_vendor_lead(&state, &auth_owner, created.vendor_lead_id)
        .await?
        .data
        .unwrap();
    assert_eq!(viewed_again.status, "seen");

    // Vendor sends a quote: the lead flips to quoted
    let quoted = quote_service::create_quote(
        &state,
        &auth_owner,
        created.vendor_lead_id,
        quote_request(120_000),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(quoted.quote.status, "sent");
    assert_eq!(quoted.vendor_lead.status, "quoted");

    // A second quote while one is active is rejected
    let second = quote_service::create_quote(
        &state,
        &auth_owner,
        created.vendor_lead_id,
        quote_request(100_000),
    )
    .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    // Customer views and accepts through the access key from the lead
    let access_key = lead_access_key(&state, created.lead_id).await?;
    let quote_view = quote_service::view_quote(
        &state,
        quoted.quote.id,
        QuoteAccessRequest { access_key },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(quote_view.status, "viewed");

    let resolved = quote_service::respond_quote(
        &state,
        quoted.quote.id,
        RespondQuoteRequest {
            access_key,
            action: QuoteAction::Accept,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(resolved.quote.status, "accepted");
    assert_eq!(resolved.vendor_lead.status, "won");

    // The resolution is terminal
    let again = quote_service::respond_quote(
        &state,
        quoted.quote.id,
        RespondQuoteRequest {
            access_key,
            action: QuoteAction::Reject,
        },
    )
    .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    // A wrong access key reads as not-found
    let wrong = quote_service::view_quote(
        &state,
        quoted.quote.id,
        QuoteAccessRequest {
            access_key: Uuid::new_v4(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::NotFound)));

    // The guest lead carried the customer's email, so their review of the
    // won vendor comes out verified; it still awaits moderation
    let review = review_service::create_review(
        &state.pool,
        &auth_customer,
        CreateReviewRequest {
            vendor_id,
            rating: 5,
            comment: Some("Wonderful spread".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(review.is_verified);
    assert!(!review.is_approved);

    // A reviewer with no history at the vendor is unverified
    let stranger_id = create_user(&state, "customer", "stranger@example.com").await?;
    let auth_stranger = AuthUser {
        user_id: stranger_id,
        role: "customer".into(),
    };
    let review = review_service::create_review(
        &state.pool,
        &auth_stranger,
        CreateReviewRequest {
            vendor_id,
            rating: 4,
            comment: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!review.is_verified);

    // A submission with a bearer token links the account to the lead
    let linked = lead_service::submit_lead(
        &state,
        Some(&auth_customer),
        lead_request(vendor_id, "key-2"),
    )
    .await?
    .data
    .unwrap();
    let (linked_customer,): (Option<Uuid>,) =
        sqlx::query_as("SELECT customer_id FROM leads WHERE id = $1")
            .bind(linked.lead_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(linked_customer, Some(customer_id));

    Ok(())
}

fn lead_request(vendor_id: Uuid, idempotency_key: &str) -> CreateLeadRequest {
    CreateLeadRequest {
        vendor_id,
        customer_name: "Ada Lovelace".into(),
        customer_email: "ada@example.com".into(),
        customer_phone: None,
        segment_id: None,
        event_type: Some("wedding".into()),
        event_date: Some(Utc::now().date_naive() + Duration::days(30)),
        guest_count: Some(120),
        budget_min: Some(50_000),
        budget_max: Some(150_000),
        service_style: None,
        needs_waitstaff: true,
        needs_tableware: false,
        needs_setup: false,
        cuisine_preference: None,
        delivery_model: None,
        dietary_requirements: vec!["vegan".into()],
        notes: None,
        anti_automation_token: PROOF_SECRET.into(),
        idempotency_key: idempotency_key.into(),
    }
}

fn quote_request(total_price: i64) -> CreateQuoteRequest {
    CreateQuoteRequest {
        total_price,
        price_per_person: Some(1_000),
        message: Some("Happy to cater your event".into()),
        valid_until: Utc::now() + Duration::days(7),
    }
}

async fn lead_access_key(state: &AppState, lead_id: Uuid) -> anyhow::Result<Uuid> {
    let (access_key,): (Uuid,) = sqlx::query_as("SELECT access_key FROM leads WHERE id = $1")
        .bind(lead_id)
        .fetch_one(&state.pool)
        .await?;
    Ok(access_key)
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Clean tables between runs
    sqlx::query(
        "TRUNCATE TABLE quotes, vendor_leads, leads, reviews, favorites, notifications, \
         audit_logs, vendor_categories, vendor_services, vendor_cuisines, \
         vendor_delivery_models, vendor_tags, vendor_segments, vendor_packages, \
         vendor_images, vendors, districts, cities, categories, services, service_groups, \
         cuisine_types, delivery_models, tags, tag_groups, customer_segments, users \
         RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await?;

    Ok(AppState { pool, orm })
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        full_name: Set(None),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_approved_vendor(state: &AppState, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let city_id = Uuid::new_v4();
    sqlx::query("INSERT INTO cities (id, name, slug) VALUES ($1, 'Testville', $2)")
        .bind(city_id)
        .bind(format!("testville-{owner_id}"))
        .execute(&state.pool)
        .await?;

    let vendor = VendorActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        name: Set("Test Caterer".into()),
        slug: Set(format!("test-caterer-{owner_id}")),
        description: Set(None),
        logo_url: Set(None),
        phone: Set(None),
        email: Set(None),
        website: Set(None),
        avg_price_per_person: Set(Some(500)),
        min_guest_count: Set(Some(10)),
        max_guest_count: Set(Some(300)),
        city_id: Set(city_id),
        district_id: Set(None),
        status: Set("approved".into()),
        is_open_24_7: Set(false),
        has_refrigerated_transport: Set(false),
        is_halal_certified: Set(false),
        offers_free_tasting: Set(false),
        offers_free_delivery: Set(false),
        accepts_last_minute: Set(false),
        serves_outside_city: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(vendor.id)
}
