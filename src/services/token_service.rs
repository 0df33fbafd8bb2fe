//! Domain service for bearer tokens.
//!
//! A token is an opaque credential bound one-to-one to an account. Issuing is
//! idempotent: the first successful authentication mints a key, every later
//! one returns the same key. Tokens do not expire and there is no revoke
//! operation.

use crate::services::account_service::{AccountError, AccountInfo};

/// Domain service trait for token issuance and resolution.
#[async_trait::async_trait]
pub trait TokenService: Send + Sync {
    /// Returns the account's token key, creating it on first call.
    async fn issue_or_get(&self, account_id: i32) -> Result<String, AccountError>;

    /// Resolves a token key to its owning account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown key or a
    /// key whose owner has been deactivated.
    async fn resolve(&self, key: &str) -> Result<AccountInfo, AccountError>;
}
