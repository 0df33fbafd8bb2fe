use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::AccountInfo;

/// The caller's account, resolved from the `Authorization` header.
///
/// Token resolution happens inside the extractor rather than in route-level
/// middleware so that method-not-allowed responses (e.g. POST on a read-only
/// resource) are produced by the router before authentication is consulted.
pub struct CurrentAccount(pub AccountInfo);

impl FromRequestParts<Arc<AppState>> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let key = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authentication credentials were not provided"))?;

        let account = state
            .token_service
            .resolve(&key)
            .await
            .map_err(|_| ApiError::unauthorized("Invalid token"))?;

        tracing::Span::current().record("user_id", account.email.as_str());

        Ok(Self(account))
    }
}

/// A [`CurrentAccount`] that is additionally a staff member. Used by the
/// admin endpoints.
pub struct StaffAccount(pub AccountInfo);

impl FromRequestParts<Arc<AppState>> for StaffAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentAccount(account) = CurrentAccount::from_request_parts(parts, state).await?;

        if !account.is_staff {
            return Err(ApiError::forbidden("Staff access required"));
        }

        Ok(Self(account))
    }
}

/// Extract the bearer token from the `Authorization` header. Both the
/// `Bearer <key>` and `Token <key>` schemes are accepted.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    for scheme in ["Bearer ", "Token "] {
        if let Some(key) = auth_str.strip_prefix(scheme) {
            let key = key.trim();
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
    }

    None
}
