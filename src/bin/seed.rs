use std::env;

use gazman_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@gazman.cm".to_string());
    let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let driver_email = env::var("DRIVER_EMAIL").unwrap_or_else(|_| "driver@gazman.cm".to_string());
    let driver_password = env::var("DRIVER_PASSWORD").unwrap_or_else(|_| "driver123".to_string());

    let admin_id = ensure_user(&pool, "Admin", &admin_email, &admin_password, "admin").await?;
    let driver_id = ensure_user(
        &pool,
        "Livreur Principal",
        &driver_email,
        &driver_password,
        "driver",
    )
    .await?;
    let client_id = ensure_user(
        &pool,
        "Client Demo",
        "client@gazman.cm",
        "client123",
        "client",
    )
    .await?;
    seed_products(&pool).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Driver ID: {driver_id}, Client ID: {client_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    // Existing accounts keep their password; only the role is enforced.
    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, state, language)
        VALUES ($1, $2, $3, $4, $5, 'Littoral', 'fr')
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email.trim().to_lowercase())
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

struct SeedProduct {
    name: &'static str,
    brand: &'static str,
    category: &'static str,
    size: &'static str,
    capacity: &'static str,
    price: i64,
    stock: i32,
    description: &'static str,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Total Gaz 6kg",
        brand: "Total",
        category: "domestic",
        size: "small",
        capacity: "6kg",
        price: 3_500,
        stock: 120,
        description: "Compact cylinder for small households and camping stoves",
    },
    SeedProduct {
        name: "Total Gaz 12.5kg",
        brand: "Total",
        category: "domestic",
        size: "medium",
        capacity: "12.5kg",
        price: 6_500,
        stock: 200,
        description: "Standard family cylinder",
    },
    SeedProduct {
        name: "Tradex Gaz 12.5kg",
        brand: "Tradex",
        category: "domestic",
        size: "medium",
        capacity: "12.5kg",
        price: 6_500,
        stock: 150,
        description: "Standard family cylinder from Tradex",
    },
    SeedProduct {
        name: "SCTM Gaz 12.5kg",
        brand: "SCTM",
        category: "domestic",
        size: "medium",
        capacity: "12.5kg",
        price: 6_400,
        stock: 90,
        description: "Family cylinder with safety valve",
    },
    SeedProduct {
        name: "Camgaz 35kg",
        brand: "Camgaz",
        category: "industrial",
        size: "large",
        capacity: "35kg",
        price: 22_000,
        stock: 40,
        description: "High capacity cylinder for restaurants and workshops",
    },
    SeedProduct {
        name: "Tradex Gaz 50kg",
        brand: "Tradex",
        category: "industrial",
        size: "large",
        capacity: "50kg",
        price: 32_000,
        stock: 25,
        description: "Industrial cylinder for continuous use",
    },
    SeedProduct {
        name: "Recharge 12.5kg",
        brand: "Gazman",
        category: "refill",
        size: "medium",
        capacity: "12.5kg",
        price: 6_000,
        stock: 500,
        description: "Refill of your own 12.5kg cylinder",
    },
    SeedProduct {
        name: "Location bouteille 12.5kg",
        brand: "Gazman",
        category: "rental",
        size: "medium",
        capacity: "12.5kg",
        price: 2_000,
        stock: 60,
        description: "Monthly cylinder rental",
    },
    SeedProduct {
        name: "Installation détendeur",
        brand: "Gazman",
        category: "installation",
        size: "small",
        capacity: "-",
        price: 5_000,
        stock: 1_000,
        description: "Regulator and hose installation by a technician",
    },
    SeedProduct {
        name: "Intervention fuite de gaz",
        brand: "Gazman",
        category: "emergency",
        size: "small",
        capacity: "-",
        price: 10_000,
        stock: 1_000,
        description: "Emergency leak intervention within the hour",
    },
];

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for product in PRODUCTS {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, brand, category, size, capacity, price, stock, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.name)
        .bind(product.brand)
        .bind(product.category)
        .bind(product.size)
        .bind(product.capacity)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.description)
        .execute(pool)
        .await?;
    }

    println!("Seeded {} products", PRODUCTS.len());
    Ok(())
}
