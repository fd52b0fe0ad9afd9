mod common;

use gazman_api::{
    domain::policy::UserRole,
    dto::{
        addresses::{CreateAddressRequest, UpdateAddressRequest},
        auth::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
    },
    error::AppError,
    middleware::auth::{AuthUser, decode_token},
    models::Language,
    services::{address_service, auth_service},
};

fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Awa Ngono".into(),
        email: email.into(),
        password: password.into(),
        address: Some("Bonapriso".into()),
        state: Some("Littoral".into()),
        language: Language::Fr,
    }
}

fn address(name: &str, is_default: bool) -> CreateAddressRequest {
    CreateAddressRequest {
        name: name.into(),
        city: "Douala".into(),
        quartier: "Akwa".into(),
        description: Some("Near the pharmacy".into()),
        phone: None,
        is_default,
    }
}

#[tokio::test]
async fn register_login_and_reset_password() -> anyhow::Result<()> {
    let Some(state) = common::state().await? else {
        return Ok(());
    };
    let email = format!("{}@test.gazman.cm", common::unique("awa"));

    let registered = auth_service::register_user(&state, register_request(&email, "secret1"))
        .await?
        .data
        .unwrap();
    assert_eq!(registered.user.role, UserRole::Client);
    assert_eq!(registered.user.language, Language::Fr);
    let subject = decode_token(&registered.access_token, &state.auth)?;
    assert_eq!(subject, registered.user.id);

    let err = auth_service::register_user(&state, register_request(&email, "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: email.clone(),
            password: "wrong-password".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let forgot = auth_service::forgot_password(
        &state,
        ForgotPasswordRequest {
            email: email.clone(),
        },
    )
    .await?
    .data
    .unwrap();
    let token = forgot.reset_token.expect("token echo is enabled for tests");

    auth_service::reset_password(
        &state,
        ResetPasswordRequest {
            email: email.clone(),
            reset_token: token.clone(),
            new_password: "brand-new".into(),
        },
    )
    .await?;

    // Tokens are single use.
    let err = auth_service::reset_password(
        &state,
        ResetPasswordRequest {
            email: email.clone(),
            reset_token: token,
            new_password: "another-one".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let logged_in = auth_service::login_user(
        &state,
        LoginRequest {
            email: email.clone(),
            password: "brand-new".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(logged_in.user.id, registered.user.id);
    Ok(())
}

#[tokio::test]
async fn unknown_email_gets_the_same_answer() -> anyhow::Result<()> {
    let Some(state) = common::state().await? else {
        return Ok(());
    };
    let resp = auth_service::forgot_password(
        &state,
        ForgotPasswordRequest {
            email: format!("{}@nowhere.cm", common::unique("ghost")),
        },
    )
    .await?;
    assert_eq!(
        resp.message,
        "If the email exists, password reset instructions have been sent"
    );
    assert!(resp.data.unwrap().reset_token.is_none());
    Ok(())
}

async fn default_names(state: &gazman_api::state::AppState, user: &AuthUser) -> anyhow::Result<Vec<String>> {
    let list = address_service::list_addresses(state, user).await?.data.unwrap();
    Ok(list
        .items
        .into_iter()
        .filter(|a| a.is_default)
        .map(|a| a.name)
        .collect())
}

#[tokio::test]
async fn exactly_one_default_address() -> anyhow::Result<()> {
    let Some(state) = common::state().await? else {
        return Ok(());
    };
    let user = common::create_user(&state, UserRole::Client).await?;

    let home = address_service::create_address(&state, &user, address("Maison", false))
        .await?
        .data
        .unwrap();
    assert!(home.is_default, "first address becomes the default");

    let office = address_service::create_address(&state, &user, address("Bureau", true))
        .await?
        .data
        .unwrap();
    assert!(office.is_default);
    assert_eq!(default_names(&state, &user).await?, vec!["Bureau".to_string()]);

    address_service::set_default(&state, &user, home.id).await?;
    assert_eq!(default_names(&state, &user).await?, vec!["Maison".to_string()]);

    // The default moves only by promoting another address.
    let err = address_service::update_address(
        &state,
        &user,
        home.id,
        UpdateAddressRequest {
            is_default: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(default_names(&state, &user).await?, vec!["Maison".to_string()]);

    let renamed = address_service::update_address(
        &state,
        &user,
        office.id,
        UpdateAddressRequest {
            name: Some("Bureau Bonanjo".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(renamed.name, "Bureau Bonanjo");
    assert!(!renamed.is_default);

    let err = address_service::update_address(
        &state,
        &user,
        office.id,
        UpdateAddressRequest {
            city: Some("   ".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Deleting the default promotes the remaining address.
    address_service::delete_address(&state, &user, home.id).await?;
    assert_eq!(
        default_names(&state, &user).await?,
        vec!["Bureau Bonanjo".to_string()]
    );

    let stranger = common::create_user(&state, UserRole::Client).await?;
    let err = address_service::get_address(&state, &stranger, office.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}
