//! Domain service for account management.
//!
//! Handles signup, credential checks, and profile reads/updates. Admin-only
//! operations (listing and creating accounts with privilege flags) live on
//! the same trait since they share validation and storage.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Deliberately generic: never reveals whether the email or the
    /// password was wrong, or that the account is inactive.
    #[error("Unable to authenticate with provided credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Account info DTO for responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Typed field set for account creation. Flags default to a plain,
/// active, non-privileged account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewAccount {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
            is_staff: false,
            is_superuser: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Superusers are implicitly staff, matching the admin surface's
    /// access rule.
    #[must_use]
    pub const fn superuser(mut self) -> Self {
        self.is_staff = true;
        self.is_superuser = true;
        self
    }
}

/// Partial profile update; omitted fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Domain service trait for account management.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates an account after validating email shape, password length,
    /// and email uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Validation`] on malformed input or a
    /// duplicate email; no partial state is left behind in either case.
    async fn create_account(&self, new_account: NewAccount) -> Result<AccountInfo, AccountError>;

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown email,
    /// a wrong password, or an inactive account.
    async fn authenticate(&self, email: &str, password: &str)
    -> Result<AccountInfo, AccountError>;

    /// Returns the caller's own account.
    async fn get_profile(&self, account_id: i32) -> Result<AccountInfo, AccountError>;

    /// Applies a partial update to the caller's own account. Repeating the
    /// same update is a no-op on the resulting state.
    async fn update_profile(
        &self,
        account_id: i32,
        update: ProfileUpdate,
    ) -> Result<AccountInfo, AccountError>;

    /// Lists every account, oldest first. Admin surface only.
    async fn list_accounts(&self) -> Result<Vec<AccountInfo>, AccountError>;

    /// Fetches one account by id. Admin surface only.
    async fn get_account(&self, account_id: i32) -> Result<AccountInfo, AccountError>;
}
