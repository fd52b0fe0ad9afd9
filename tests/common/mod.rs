#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;
use gazman_api::{
    config::AuthSettings,
    db,
    domain::{
        catalog::{ProductCategory, ProductSize},
        policy::UserRole,
    },
    entity::{products, users},
    middleware::auth::AuthUser,
    models::Language,
    state::AppState,
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use uuid::Uuid;

/// Connect to the integration database, or `None` to skip when none is configured.
pub async fn state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests.");
            return Ok(None);
        }
    };

    let orm = db::connect(&database_url).await?;
    Ok(Some(AppState {
        orm,
        auth: AuthSettings {
            jwt_secret: Arc::from("integration-secret"),
            token_ttl: Duration::minutes(30),
            expose_reset_token: true,
        },
    }))
}

/// Tests share one database, so every fixture gets a unique email or name.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub async fn create_user(state: &AppState, role: UserRole) -> anyhow::Result<AuthUser> {
    let name = unique(&role.to_string());
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.clone()),
        email: Set(format!("{name}@test.gazman.cm")),
        password_hash: Set("not-a-real-hash".into()),
        role: Set(role),
        address: Set(None),
        state: Set(None),
        language: Set(Language::Fr),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        name: user.name,
        role: user.role,
    })
}

pub async fn create_product(state: &AppState, price: i64, stock: i32) -> anyhow::Result<products::Model> {
    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(unique("Bouteille 12.5kg")),
        brand: Set("Tradex".into()),
        category: Set(ProductCategory::Domestic),
        size: Set(ProductSize::Medium),
        capacity: Set("12.5kg".into()),
        price: Set(price),
        stock: Set(stock),
        image_url: Set(String::new()),
        description: Set("Integration test cylinder".into()),
        rating: Set(4.5),
        delivery_time: Set("15-20 min".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}
