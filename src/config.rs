use std::{env, sync::Arc};

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub cors_origins: Vec<String>,
    pub expose_reset_token: bool,
}

/// Settings the credential layer needs at request time.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: Arc<str>,
    pub token_ttl: Duration,
    /// Dev only: echo password reset tokens back to the caller.
    pub expose_reset_token: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_ttl_minutes = env::var("JWT_TTL_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(24 * 60);
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let expose_reset_token = env::var("RESET_TOKEN_IN_RESPONSE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_ttl_minutes,
            cors_origins,
            expose_reset_token,
        })
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: Arc::from(self.jwt_secret.as_str()),
            token_ttl: Duration::minutes(self.jwt_ttl_minutes),
            expose_reset_token: self.expose_reset_token,
        }
    }
}
