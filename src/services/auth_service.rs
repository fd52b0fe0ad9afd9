use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    audit::record,
    config::AuthSettings,
    domain::policy::UserRole,
    dto::auth::{
        Claims, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, RegisterRequest,
        ResetPasswordRequest, TokenResponse,
    },
    entity::{
        PasswordResets, Users,
        password_resets::{self, Column as ResetCol},
        users::{self, Column as UserCol},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Empty, Meta},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(user_id: Uuid, settings: &AuthSettings) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(settings.token_ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn token_response(user: users::Model, settings: &AuthSettings) -> AppResult<TokenResponse> {
    Ok(TokenResponse {
        access_token: issue_token(user.id, settings)?,
        token_type: "bearer".to_string(),
        user: User::from(user),
    })
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let RegisterRequest {
        name,
        email,
        password,
        address,
        state: region,
        language,
    } = payload;

    let email = email.trim().to_string();
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    check_password(&password)?;

    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        email: Set(email),
        password_hash: Set(hash_password(&password)?),
        role: Set(UserRole::Client),
        address: Set(address),
        state: Set(region),
        language: Set(language),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Email already registered".into())
        }
        _ => AppError::OrmError(err),
    })?;

    record(
        &state.orm,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success(
        "User created",
        token_response(user, &state.auth)?,
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let LoginRequest { email, password } = payload;
    let user = Users::find()
        .filter(UserCol::Email.eq(email.trim()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Incorrect email or password".into())),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Incorrect email or password".into()));
    }

    record(
        &state.orm,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        token_response(user, &state.auth)?,
        Some(Meta::empty()),
    ))
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(ApiResponse::success("OK", User::from(model), Some(Meta::empty())))
}

/// Always answers the same way whether or not the email is registered.
pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<ForgotPasswordResponse>> {
    const MESSAGE: &str = "If the email exists, password reset instructions have been sent";

    let email = payload.email.trim().to_string();
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let Some(user) = user else {
        return Ok(ApiResponse::success(
            MESSAGE,
            ForgotPasswordResponse { reset_token: None },
            Some(Meta::empty()),
        ));
    };

    let reset_token = Uuid::new_v4().to_string();
    PasswordResets::insert(password_resets::ActiveModel {
        email: Set(email),
        reset_token: Set(reset_token.clone()),
        used: Set(false),
        created_at: Set(Utc::now().into()),
    })
    .on_conflict(
        OnConflict::column(ResetCol::Email)
            .update_columns([ResetCol::ResetToken, ResetCol::Used, ResetCol::CreatedAt])
            .to_owned(),
    )
    .exec(&state.orm)
    .await?;

    tracing::info!(user_id = %user.id, "password reset requested");

    let reset_token = state.auth.expose_reset_token.then_some(reset_token);
    Ok(ApiResponse::success(
        MESSAGE,
        ForgotPasswordResponse { reset_token },
        Some(Meta::empty()),
    ))
}

pub async fn reset_password(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<Empty>> {
    check_password(&payload.new_password)?;
    let email = payload.email.trim().to_string();
    let password_hash = hash_password(&payload.new_password)?;

    let txn = state.orm.begin().await?;

    // Consuming the token first makes a concurrent second use match zero rows.
    let consumed = PasswordResets::update_many()
        .set(password_resets::ActiveModel {
            used: Set(true),
            ..Default::default()
        })
        .filter(ResetCol::Email.eq(email.as_str()))
        .filter(ResetCol::ResetToken.eq(payload.reset_token.as_str()))
        .filter(ResetCol::Used.eq(false))
        .exec(&txn)
        .await?;
    if consumed.rows_affected == 0 {
        return Err(AppError::BadRequest("Invalid or expired reset token".into()));
    }

    let updated = Users::update_many()
        .set(users::ActiveModel {
            password_hash: Set(password_hash),
            ..Default::default()
        })
        .filter(UserCol::Email.eq(email.as_str()))
        .exec(&txn)
        .await?;
    if updated.rows_affected == 0 {
        return Err(AppError::NotFound("User"));
    }

    txn.commit().await?;

    record(
        &state.orm,
        None,
        "password_reset",
        "users",
        serde_json::json!({ "email": email }),
    )
    .await;

    Ok(ApiResponse::message("Password reset successful"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::middleware::auth::decode_token;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("bouteille").unwrap();
        let second = hash_password("bouteille").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password("bouteille", &first).unwrap());
        assert!(!verify_password("wrong", &first).unwrap());
    }

    #[test]
    fn issued_tokens_decode_to_the_subject() {
        let settings = AuthSettings {
            jwt_secret: Arc::from("unit-secret"),
            token_ttl: Duration::minutes(30),
            expose_reset_token: false,
        };
        let id = Uuid::new_v4();
        let token = issue_token(id, &settings).unwrap();
        assert_eq!(decode_token(&token, &settings).unwrap(), id);
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(check_password("12345").is_err());
        assert!(check_password("123456").is_ok());
    }
}
