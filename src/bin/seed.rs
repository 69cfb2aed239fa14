use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use axum_catering_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let owner_id = ensure_user(&pool, "owner@example.com", "owner123", "vendor_owner").await?;
    let customer_id = ensure_user(&pool, "customer@example.com", "customer123", "customer").await?;

    seed_taxonomy(&pool).await?;
    seed_vendor(&pool, owner_id).await?;

    println!("Seed completed. Admin: {admin_id}, Owner: {owner_id}, Customer: {customer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_row(pool: &sqlx::PgPool, table: &str, name: &str, slug: &str) -> anyhow::Result<Uuid> {
    let sql = format!(
        "INSERT INTO {table} (id, name, slug) VALUES ($1, $2, $3) \
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name RETURNING id"
    );
    let (id,): (Uuid,) = sqlx::query_as(&sql)
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn ensure_child_row(
    pool: &sqlx::PgPool,
    table: &str,
    parent_column: &str,
    parent_id: Uuid,
    name: &str,
    slug: &str,
) -> anyhow::Result<Uuid> {
    let sql = format!(
        "INSERT INTO {table} (id, {parent_column}, name, slug) VALUES ($1, $2, $3, $4) \
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name RETURNING id"
    );
    let (id,): (Uuid,) = sqlx::query_as(&sql)
        .bind(Uuid::new_v4())
        .bind(parent_id)
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn seed_taxonomy(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let istanbul = ensure_row(pool, "cities", "Istanbul", "istanbul").await?;
    ensure_child_row(pool, "districts", "city_id", istanbul, "Kadikoy", "kadikoy").await?;
    ensure_child_row(pool, "districts", "city_id", istanbul, "Besiktas", "besiktas").await?;
    let ankara = ensure_row(pool, "cities", "Ankara", "ankara").await?;
    ensure_child_row(pool, "districts", "city_id", ankara, "Cankaya", "cankaya").await?;

    ensure_row(pool, "categories", "Wedding Catering", "wedding-catering").await?;
    ensure_row(pool, "categories", "Corporate Catering", "corporate-catering").await?;

    let events = ensure_row(pool, "service_groups", "Event Services", "event-services").await?;
    ensure_child_row(pool, "services", "group_id", events, "Waitstaff", "waitstaff").await?;
    ensure_child_row(pool, "services", "group_id", events, "Table Setup", "table-setup").await?;

    ensure_row(pool, "cuisine_types", "Turkish", "turkish").await?;
    ensure_row(pool, "cuisine_types", "Italian", "italian").await?;

    ensure_row(pool, "delivery_models", "Full Service", "full-service").await?;
    ensure_row(pool, "delivery_models", "Drop Off", "drop-off").await?;

    let dietary = ensure_row(pool, "tag_groups", "Dietary", "dietary").await?;
    ensure_child_row(pool, "tags", "group_id", dietary, "Vegan Options", "vegan-options").await?;
    ensure_child_row(pool, "tags", "group_id", dietary, "Gluten Free", "gluten-free").await?;

    ensure_row(pool, "customer_segments", "Weddings", "weddings").await?;
    ensure_row(pool, "customer_segments", "Corporate", "corporate").await?;

    println!("Seeded taxonomy");
    Ok(())
}

async fn seed_vendor(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<()> {
    let (city_id,): (Uuid,) = sqlx::query_as("SELECT id FROM cities WHERE slug = 'istanbul'")
        .fetch_one(pool)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO vendors (id, owner_id, name, slug, description, avg_price_per_person,
                             min_guest_count, max_guest_count, city_id, status,
                             offers_free_tasting, accepts_last_minute)
        VALUES ($1, $2, 'Bosphorus Banquets', 'bosphorus-banquets',
                'Full-service catering on both sides of the city', 45000, 20, 500, $3,
                'approved', TRUE, TRUE)
        ON CONFLICT (slug) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(city_id)
    .execute(pool)
    .await?;

    println!("Seeded vendor");
    Ok(())
}
