use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentAccount;
use super::validation::require_field;
use super::{ApiError, ApiResponse, AppState, ProfileDto, TokenDto};
use crate::services::{AccountError, NewAccount, ProfileUpdate};

// ============================================================================
// Request Types
// ============================================================================

/// All fields optional so that missing input maps to a 400 with a field-level
/// message instead of a body-deserialization rejection.
#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct ObtainTokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users/create
/// Sign up with email, password, and an optional display name.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileDto>>), ApiError> {
    let email = require_field(payload.email, "Email")?;
    let password = require_field(payload.password, "Password")?;

    let mut new_account = NewAccount::new(email, password);
    if let Some(name) = payload.name {
        new_account = new_account.with_name(name);
    }

    let account = state.account_service.create_account(new_account).await?;

    tracing::info!("Account created: {}", account.email);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ProfileDto::from(account))),
    ))
}

/// POST /users/token
/// Exchange credentials for the account's bearer token. Any failure, wrong
/// password or missing field alike, is a 400 whose body carries no token.
pub async fn obtain_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ObtainTokenRequest>,
) -> Result<Json<ApiResponse<TokenDto>>, ApiError> {
    let email = require_field(payload.email, "Email")?;
    let password = require_field(payload.password, "Password")?;

    let account = state
        .account_service
        .authenticate(&email, &password)
        .await
        .map_err(|err| match err {
            AccountError::InvalidCredentials => ApiError::validation(err.to_string()),
            other => ApiError::from(other),
        })?;

    let token = state.token_service.issue_or_get(account.id).await?;

    Ok(Json(ApiResponse::success(TokenDto { token })))
}

/// GET /users/me
/// Return the caller's own profile.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let profile = state.account_service.get_profile(account.id).await?;

    Ok(Json(ApiResponse::success(ProfileDto::from(profile))))
}

/// PATCH /users/me
/// Partially update the caller's name and/or password.
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let update = ProfileUpdate {
        name: payload.name,
        password: payload.password,
    };

    let profile = state
        .account_service
        .update_profile(account.id, update)
        .await?;

    tracing::info!("Profile updated: {}", profile.email);

    Ok(Json(ApiResponse::success(ProfileDto::from(profile))))
}
