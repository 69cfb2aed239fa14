use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::log_audit,
    dto::vendors::{
        PackageList, PackageRequest, UpdateVendorProfileRequest, VendorApplicationRequest,
        VendorDetail,
    },
    entity::{
        vendor_images::{Column as ImageCol, Entity as VendorImages},
        vendor_links,
        vendor_packages::{
            ActiveModel as PackageActive, Column as PackageCol, Entity as VendorPackages,
            Model as PackageModel,
        },
        vendors::{ActiveModel as VendorActive, Column as VendorCol, Entity as Vendors, Model as VendorModel},
    },
    error::{AppError, AppResult, from_validation_errors},
    middleware::auth::{AuthUser, ensure_vendor_owner},
    models::{RatingSummary, TaxonomyItem, Vendor, VendorImage, VendorPackage},
    response::{ApiResponse, Meta},
    state::AppState,
    status::VendorStatus,
};

/// Resolve the vendor owned by the authenticated vendor owner. Each owner
/// account runs exactly one vendor profile.
pub async fn vendor_for_owner(state: &AppState, user: &AuthUser) -> AppResult<VendorModel> {
    ensure_vendor_owner(user)?;
    Vendors::find()
        .filter(VendorCol::OwnerId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// Vendor application: creates the profile in `pending`; a platform admin
/// approves it into the searchable set.
pub async fn apply(
    state: &AppState,
    user: &AuthUser,
    payload: VendorApplicationRequest,
) -> AppResult<ApiResponse<Vendor>> {
    ensure_vendor_owner(user)?;
    payload.validate().map_err(from_validation_errors)?;

    let existing = Vendors::find()
        .filter(VendorCol::OwnerId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "a vendor profile already exists for this account".into(),
        ));
    }

    let id = Uuid::new_v4();
    let slug = unique_slug(&payload.name, id);

    let vendor = VendorActive {
        id: Set(id),
        owner_id: Set(user.user_id),
        name: Set(payload.name),
        slug: Set(slug),
        description: Set(payload.description),
        logo_url: Set(None),
        phone: Set(payload.phone),
        email: Set(payload.email),
        website: Set(None),
        avg_price_per_person: Set(None),
        min_guest_count: Set(None),
        max_guest_count: Set(None),
        city_id: Set(payload.city_id),
        district_id: Set(payload.district_id),
        status: Set(VendorStatus::Pending.as_str().to_string()),
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

    log_audit(
        &state.pool,
        Some(user.user_id),
        "vendor_apply",
        Some("vendors"),
        Some(serde_json::json!({ "vendor_id": vendor.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Application submitted",
        vendor_from_entity(vendor),
        Some(Meta::empty()),
    ))
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Vendor>> {
    let vendor = vendor_for_owner(state, user).await?;
    Ok(ApiResponse::success(
        "Vendor profile",
        vendor_from_entity(vendor),
        None,
    ))
}

/// Owner settings update. Scalar fields patch individually; an association
/// list, when present, replaces the vendor's set wholesale.
pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateVendorProfileRequest,
) -> AppResult<ApiResponse<Vendor>> {
    let vendor = vendor_for_owner(state, user).await?;
    let vendor_id = vendor.id;

    let txn = state.orm.begin().await?;

    let mut active: VendorActive = vendor.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(logo_url) = payload.logo_url {
        active.logo_url = Set(Some(logo_url));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(email) = payload.email {
        active.email = Set(Some(email));
    }
    if let Some(website) = payload.website {
        active.website = Set(Some(website));
    }
    if let Some(price) = payload.avg_price_per_person {
        active.avg_price_per_person = Set(Some(price));
    }
    if let Some(min_guests) = payload.min_guest_count {
        active.min_guest_count = Set(Some(min_guests));
    }
    if let Some(max_guests) = payload.max_guest_count {
        active.max_guest_count = Set(Some(max_guests));
    }
    if let Some(district_id) = payload.district_id {
        active.district_id = Set(Some(district_id));
    }
    if let Some(v) = payload.is_open_24_7 {
        active.is_open_24_7 = Set(v);
    }
    if let Some(v) = payload.has_refrigerated_transport {
        active.has_refrigerated_transport = Set(v);
    }
    if let Some(v) = payload.is_halal_certified {
        active.is_halal_certified = Set(v);
    }
    if let Some(v) = payload.offers_free_tasting {
        active.offers_free_tasting = Set(v);
    }
    if let Some(v) = payload.offers_free_delivery {
        active.offers_free_delivery = Set(v);
    }
    if let Some(v) = payload.accepts_last_minute {
        active.accepts_last_minute = Set(v);
    }
    if let Some(v) = payload.serves_outside_city {
        active.serves_outside_city = Set(v);
    }
    active.updated_at = Set(Utc::now().into());
    let vendor = active.update(&txn).await?;

    if let Some(ids) = payload.category_ids {
        use vendor_links::vendor_categories::{ActiveModel, Column, Entity};
        Entity::delete_many()
            .filter(Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;
        for category_id in ids {
            ActiveModel {
                vendor_id: Set(vendor_id),
                category_id: Set(category_id),
            }
            .insert(&txn)
            .await?;
        }
    }
    if let Some(ids) = payload.service_ids {
        use vendor_links::vendor_services::{ActiveModel, Column, Entity};
        Entity::delete_many()
            .filter(Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;
        for service_id in ids {
            ActiveModel {
                vendor_id: Set(vendor_id),
                service_id: Set(service_id),
            }
            .insert(&txn)
            .await?;
        }
    }
    if let Some(ids) = payload.cuisine_ids {
        use vendor_links::vendor_cuisines::{ActiveModel, Column, Entity};
        Entity::delete_many()
            .filter(Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;
        for cuisine_id in ids {
            ActiveModel {
                vendor_id: Set(vendor_id),
                cuisine_id: Set(cuisine_id),
            }
            .insert(&txn)
            .await?;
        }
    }
    if let Some(ids) = payload.delivery_model_ids {
        use vendor_links::vendor_delivery_models::{ActiveModel, Column, Entity};
        Entity::delete_many()
            .filter(Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;
        for delivery_model_id in ids {
            ActiveModel {
                vendor_id: Set(vendor_id),
                delivery_model_id: Set(delivery_model_id),
            }
            .insert(&txn)
            .await?;
        }
    }
    if let Some(ids) = payload.tag_ids {
        use vendor_links::vendor_tags::{ActiveModel, Column, Entity};
        Entity::delete_many()
            .filter(Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;
        for tag_id in ids {
            ActiveModel {
                vendor_id: Set(vendor_id),
                tag_id: Set(tag_id),
            }
            .insert(&txn)
            .await?;
        }
    }
    if let Some(ids) = payload.segment_ids {
        use vendor_links::vendor_segments::{ActiveModel, Column, Entity};
        Entity::delete_many()
            .filter(Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;
        for segment_id in ids {
            ActiveModel {
                vendor_id: Set(vendor_id),
                segment_id: Set(segment_id),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Vendor updated",
        vendor_from_entity(vendor),
        Some(Meta::empty()),
    ))
}

/// Public vendor detail by slug: profile, taxonomy associations, images,
/// packages and the approved-review aggregate. Only approved vendors
/// resolve.
pub async fn get_vendor_detail(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<VendorDetail>> {
    let vendor = Vendors::find()
        .filter(
            Condition::all()
                .add(VendorCol::Slug.eq(slug))
                .add(VendorCol::Status.eq(VendorStatus::Approved.as_str())),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let city: TaxonomyItem =
        sqlx::query_as("SELECT id, name, slug FROM cities WHERE id = $1")
            .bind(vendor.city_id)
            .fetch_one(&state.pool)
            .await?;

    let district: Option<TaxonomyItem> = match vendor.district_id {
        Some(district_id) => {
            sqlx::query_as("SELECT id, name, slug FROM districts WHERE id = $1")
                .bind(district_id)
                .fetch_optional(&state.pool)
                .await?
        }
        None => None,
    };

    let categories = linked_taxonomy(
        state,
        "categories",
        "vendor_categories",
        "category_id",
        vendor.id,
    )
    .await?;
    let services =
        linked_taxonomy(state, "services", "vendor_services", "service_id", vendor.id).await?;
    let cuisines = linked_taxonomy(
        state,
        "cuisine_types",
        "vendor_cuisines",
        "cuisine_id",
        vendor.id,
    )
    .await?;
    let delivery_models = linked_taxonomy(
        state,
        "delivery_models",
        "vendor_delivery_models",
        "delivery_model_id",
        vendor.id,
    )
    .await?;
    let tags = linked_taxonomy(state, "tags", "vendor_tags", "tag_id", vendor.id).await?;
    let segments = linked_taxonomy(
        state,
        "customer_segments",
        "vendor_segments",
        "segment_id",
        vendor.id,
    )
    .await?;

    let images = VendorImages::find()
        .filter(ImageCol::VendorId.eq(vendor.id))
        .order_by_desc(ImageCol::IsPrimary)
        .order_by_asc(ImageCol::SortOrder)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| VendorImage {
            id: m.id,
            vendor_id: m.vendor_id,
            image_url: m.image_url,
            is_primary: m.is_primary,
            sort_order: m.sort_order,
        })
        .collect();

    let packages = VendorPackages::find()
        .filter(PackageCol::VendorId.eq(vendor.id))
        .order_by_asc(PackageCol::PricePerPerson)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(package_from_entity)
        .collect();

    let rating = rating_summary(state, vendor.id).await?;

    let detail = VendorDetail {
        vendor: vendor_from_entity(vendor),
        city,
        district,
        categories,
        services,
        cuisines,
        delivery_models,
        tags,
        segments,
        images,
        packages,
        rating,
    };

    Ok(ApiResponse::success("Vendor", detail, None))
}

pub async fn list_packages(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PackageList>> {
    let vendor = vendor_for_owner(state, user).await?;
    let items = VendorPackages::find()
        .filter(PackageCol::VendorId.eq(vendor.id))
        .order_by_asc(PackageCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(package_from_entity)
        .collect();
    Ok(ApiResponse::success(
        "Packages",
        PackageList { items },
        None,
    ))
}

pub async fn create_package(
    state: &AppState,
    user: &AuthUser,
    payload: PackageRequest,
) -> AppResult<ApiResponse<VendorPackage>> {
    let vendor = vendor_for_owner(state, user).await?;
    payload.validate().map_err(from_validation_errors)?;

    let package = PackageActive {
        id: Set(Uuid::new_v4()),
        vendor_id: Set(vendor.id),
        name: Set(payload.name),
        description: Set(payload.description),
        price_per_person: Set(payload.price_per_person),
        min_guests: Set(payload.min_guests),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Package created",
        package_from_entity(package),
        Some(Meta::empty()),
    ))
}

pub async fn update_package(
    state: &AppState,
    user: &AuthUser,
    package_id: Uuid,
    payload: PackageRequest,
) -> AppResult<ApiResponse<VendorPackage>> {
    let vendor = vendor_for_owner(state, user).await?;
    payload.validate().map_err(from_validation_errors)?;

    let package = owned_package(state, vendor.id, package_id).await?;

    let mut active: PackageActive = package.into();
    active.name = Set(payload.name);
    active.description = Set(payload.description);
    active.price_per_person = Set(payload.price_per_person);
    active.min_guests = Set(payload.min_guests);
    let package = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Package updated",
        package_from_entity(package),
        Some(Meta::empty()),
    ))
}

pub async fn delete_package(
    state: &AppState,
    user: &AuthUser,
    package_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let vendor = vendor_for_owner(state, user).await?;
    let package = owned_package(state, vendor.id, package_id).await?;

    VendorPackages::delete_by_id(package.id)
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Package deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn owned_package(
    state: &AppState,
    vendor_id: Uuid,
    package_id: Uuid,
) -> AppResult<PackageModel> {
    VendorPackages::find()
        .filter(
            Condition::all()
                .add(PackageCol::Id.eq(package_id))
                .add(PackageCol::VendorId.eq(vendor_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn rating_summary(state: &AppState, vendor_id: Uuid) -> AppResult<RatingSummary> {
    let summary: RatingSummary = sqlx::query_as(
        r#"
        SELECT AVG(rating)::float8 AS rating_avg, COUNT(*) AS review_count
        FROM reviews
        WHERE vendor_id = $1 AND is_approved
        "#,
    )
    .bind(vendor_id)
    .fetch_one(&state.pool)
    .await?;
    Ok(summary)
}

/// Taxonomy rows linked to a vendor through a join table. Table and column
/// names are module constants, never caller input.
async fn linked_taxonomy(
    state: &AppState,
    taxonomy_table: &str,
    join_table: &str,
    join_column: &str,
    vendor_id: Uuid,
) -> AppResult<Vec<TaxonomyItem>> {
    let sql = format!(
        "SELECT t.id, t.name, t.slug FROM {taxonomy_table} t \
         JOIN {join_table} j ON j.{join_column} = t.id \
         WHERE j.vendor_id = $1 ORDER BY t.name"
    );
    let items = sqlx::query_as(&sql)
        .bind(vendor_id)
        .fetch_all(&state.pool)
        .await?;
    Ok(items)
}

/// Lowercased, hyphenated slug with a short id suffix to keep it unique
/// without a retry loop.
fn unique_slug(name: &str, id: Uuid) -> String {
    let base: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let base = base.trim_matches('-').to_string();
    let mut collapsed = String::with_capacity(base.len());
    let mut last_dash = false;
    for c in base.chars() {
        if c == '-' {
            if !last_dash {
                collapsed.push('-');
            }
            last_dash = true;
        } else {
            collapsed.push(c);
            last_dash = false;
        }
    }
    let suffix = &id.to_string()[..8];
    format!("{collapsed}-{suffix}")
}

pub(crate) fn vendor_from_entity(model: VendorModel) -> Vendor {
    Vendor {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        logo_url: model.logo_url,
        phone: model.phone,
        email: model.email,
        website: model.website,
        avg_price_per_person: model.avg_price_per_person,
        min_guest_count: model.min_guest_count,
        max_guest_count: model.max_guest_count,
        city_id: model.city_id,
        district_id: model.district_id,
        status: model.status,
        is_open_24_7: model.is_open_24_7,
        has_refrigerated_transport: model.has_refrigerated_transport,
        is_halal_certified: model.is_halal_certified,
        offers_free_tasting: model.offers_free_tasting,
        offers_free_delivery: model.offers_free_delivery,
        accepts_last_minute: model.accepts_last_minute,
        serves_outside_city: model.serves_outside_city,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn package_from_entity(model: PackageModel) -> VendorPackage {
    VendorPackage {
        id: model.id,
        vendor_id: model.vendor_id,
        name: model.name,
        description: model.description,
        price_per_person: model.price_per_person,
        min_guests: model.min_guests,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_lowercased_hyphenated_and_suffixed() {
        let id = Uuid::nil();
        let slug = unique_slug("Anatolia Catering & Events", id);
        assert!(slug.starts_with("anatolia-catering-events-"));
        assert!(slug.ends_with("00000000"));
        assert!(!slug.contains("--"));
    }

    #[test]
    fn slug_trims_leading_and_trailing_separators() {
        let id = Uuid::nil();
        let slug = unique_slug("  !!Fancy Food!!  ", id);
        assert!(slug.starts_with("fancy-food-"));
    }
}
