use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    config::AuthSettings,
    domain::policy::{Capability, UserRole},
    dto::auth::Claims,
    entity::Users,
    error::AppError,
    state::AppState,
};

/// The caller behind a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.role.grants(capability) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    user.require(Capability::Admin)
}

pub fn ensure_driver(user: &AuthUser) -> Result<(), AppError> {
    user.require(Capability::Driver)
}

/// Check signature and expiry, returning the subject user id.
pub fn decode_token(token: &str, settings: &AuthSettings) -> Result<Uuid, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".into()))
}

fn bearer_token(parts: &axum::http::request::Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = decode_token(token, &state.auth)?;

        // A valid token for a deleted account is still rejected.
        let user = Users::find_by_id(user_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

        Ok(AuthUser {
            user_id: user.id,
            name: user.name,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: Arc::from("test-secret"),
            token_ttl: Duration::minutes(5),
            expose_reset_token: false,
        }
    }

    fn token_for(sub: &str, secret: &str, exp_offset: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + exp_offset).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_a_fresh_token() {
        let id = Uuid::new_v4();
        let token = token_for(&id.to_string(), "test-secret", Duration::minutes(5));
        assert_eq!(decode_token(&token, &settings()).unwrap(), id);
    }

    #[test]
    fn rejects_wrong_signature_and_expired_tokens() {
        let id = Uuid::new_v4().to_string();

        let forged = token_for(&id, "other-secret", Duration::minutes(5));
        assert!(matches!(
            decode_token(&forged, &settings()),
            Err(AppError::Unauthorized(_))
        ));

        let expired = token_for(&id, "test-secret", Duration::minutes(-10));
        assert!(matches!(
            decode_token(&expired, &settings()),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn capability_checks_are_forbidden_not_unauthorized() {
        let driver = AuthUser {
            user_id: Uuid::new_v4(),
            name: "Driver".into(),
            role: UserRole::Driver,
        };
        assert!(ensure_driver(&driver).is_ok());
        assert!(matches!(ensure_admin(&driver), Err(AppError::Forbidden)));
    }
}
