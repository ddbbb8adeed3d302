use super::MessageResponse;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use portfolio_auth::{hash_password, unix_now, verify_password};
use portfolio_store::{Account, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_TITLE: &str = "Software Developer";
const DEFAULT_BIO: &str = "Welcome to my portfolio!";

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<MessageResponse>)> {
    let Json(body) = body?;
    let username = body.username.trim().to_string();
    let email = body.email.trim().to_string();

    if username.is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(ServerError::Validation(
            "username, email and password are required".into(),
        ));
    }

    if state
        .accounts
        .find_by_username_or_email(&username, &email)
        .await?
        .is_some()
    {
        return Err(user_exists());
    }

    let password = body.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let account = Account::new(username.clone(), email.clone(), password_hash);
    let owner = account.id.clone();

    // A concurrent registration can still win between lookup and insert
    state.accounts.insert(account).await.map_err(|e| match e {
        StoreError::Conflict(_) => user_exists(),
        other => other.into(),
    })?;

    state
        .personal_info
        .upsert(
            &owner,
            json!({
                "name": username,
                "title": DEFAULT_TITLE,
                "bio": DEFAULT_BIO,
                "email": email,
            }),
        )
        .await?;

    tracing::info!(owner = %owner, username = %username, "account registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password fail identically.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ServerResult<Json<LoginResponse>> {
    let Json(body) = body?;

    let account = state
        .accounts
        .find_by_email(body.email.trim())
        .await?
        .ok_or(ServerError::InvalidCredentials)?;

    let password = body.password;
    let hash = account.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
    if !matches {
        tracing::debug!(owner = %account.id, "password mismatch");
        return Err(ServerError::InvalidCredentials);
    }

    let issued = state
        .tokens
        .issue(account.id.as_str(), &account.email, unix_now())?;

    tracing::info!(owner = %account.id, "login");
    Ok(Json(LoginResponse {
        token: issued.token,
        user: PublicUser {
            id: account.id.into_string(),
            username: account.username,
            email: account.email,
        },
    }))
}

fn user_exists() -> ServerError {
    ServerError::Conflict("User already exists".into())
}
