use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::StaffAccount;
use super::validation::require_field;
use super::{AccountDto, ApiError, ApiResponse, AppState};
use crate::services::{AccountError, NewAccount};

#[derive(Deserialize)]
pub struct AdminCreateAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// GET /admin/accounts
/// List every account, oldest first.
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    StaffAccount(_): StaffAccount,
) -> Result<Json<ApiResponse<Vec<AccountDto>>>, ApiError> {
    let accounts = state.account_service.list_accounts().await?;

    Ok(Json(ApiResponse::success(
        accounts.into_iter().map(AccountDto::from).collect(),
    )))
}

/// GET /admin/accounts/{id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    StaffAccount(_): StaffAccount,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let account = state
        .account_service
        .get_account(id)
        .await
        .map_err(|err| match err {
            AccountError::NotFound => ApiError::account_not_found(id),
            other => ApiError::from(other),
        })?;

    Ok(Json(ApiResponse::success(AccountDto::from(account))))
}

/// POST /admin/accounts
/// Create an account with explicit privilege flags.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    StaffAccount(caller): StaffAccount,
    Json(payload): Json<AdminCreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>), ApiError> {
    let email = require_field(payload.email, "Email")?;
    let password = require_field(payload.password, "Password")?;

    let mut new_account = NewAccount::new(email, password);
    if let Some(name) = payload.name {
        new_account = new_account.with_name(name);
    }
    if payload.is_superuser {
        new_account = new_account.superuser();
    } else {
        new_account.is_staff = payload.is_staff;
    }

    let account = state.account_service.create_account(new_account).await?;

    tracing::info!(
        "Account created by admin {}: {}",
        caller.email,
        account.email
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountDto::from(account))),
    ))
}
