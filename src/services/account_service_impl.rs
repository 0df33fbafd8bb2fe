//! `SeaORM` implementation of the `AccountService` trait.

use crate::config::SecurityConfig;
use crate::db::{CreateOutcome, NewAccountRow, Store};
use crate::services::account_service::{
    AccountError, AccountInfo, AccountService, NewAccount, ProfileUpdate,
};
use async_trait::async_trait;

pub struct SeaOrmAccountService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn check_password(&self, password: &str) -> Result<(), AccountError> {
        if password.len() < self.security.min_password_length {
            return Err(AccountError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<AccountInfo, AccountError> {
        let email = normalize_email(&new_account.email);
        validate_email(&email)?;
        self.check_password(&new_account.password)?;

        let row = NewAccountRow {
            email,
            password: new_account.password,
            name: new_account.name.unwrap_or_default(),
            is_active: true,
            is_staff: new_account.is_staff,
            is_superuser: new_account.is_superuser,
        };

        match self.store.create_account(row, &self.security).await? {
            CreateOutcome::Created(account) => Ok(account_info(account)),
            CreateOutcome::DuplicateEmail => Err(AccountError::Validation(
                "Account with this email already exists".to_string(),
            )),
        }
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountInfo, AccountError> {
        let email = normalize_email(email);

        let account = self
            .store
            .verify_account_password(&email, password)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        // Inactive accounts fail with the same generic error as a bad password.
        if !account.is_active {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(account_info(account))
    }

    async fn get_profile(&self, account_id: i32) -> Result<AccountInfo, AccountError> {
        let account = self
            .store
            .get_account_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        Ok(account_info(account))
    }

    async fn update_profile(
        &self,
        account_id: i32,
        update: ProfileUpdate,
    ) -> Result<AccountInfo, AccountError> {
        if let Some(password) = &update.password {
            self.check_password(password)?;
        }

        let account = self
            .store
            .update_account_profile(account_id, update.name, update.password, &self.security)
            .await?
            .ok_or(AccountError::NotFound)?;

        Ok(account_info(account))
    }

    async fn list_accounts(&self) -> Result<Vec<AccountInfo>, AccountError> {
        let accounts = self.store.list_accounts().await?;
        Ok(accounts.into_iter().map(account_info).collect())
    }

    async fn get_account(&self, account_id: i32) -> Result<AccountInfo, AccountError> {
        let account = self
            .store
            .get_account_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        Ok(account_info(account))
    }
}

fn account_info(account: crate::db::Account) -> AccountInfo {
    AccountInfo {
        id: account.id,
        email: account.email,
        name: account.name,
        is_active: account.is_active,
        is_staff: account.is_staff,
        is_superuser: account.is_superuser,
        created_at: account.created_at,
        updated_at: account.updated_at,
    }
}

/// Emails are matched case-insensitively; storing them lowercased makes the
/// database's unique index do that work.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal syntactic check: one `@`, non-empty local part, a domain with at
/// least one dot, no whitespace anywhere.
pub fn validate_email(email: &str) -> Result<(), AccountError> {
    let invalid = || AccountError::Validation("Enter a valid email address".to_string());

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return Err(invalid());
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let has_dot_inside = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    if !has_dot_inside {
        return Err(invalid());
    }

    Ok(())
}
