//! `SeaORM` implementation of the `TokenService` trait.

use crate::db::Store;
use crate::services::account_service::{AccountError, AccountInfo};
use crate::services::token_service::TokenService;
use async_trait::async_trait;

pub struct SeaOrmTokenService {
    store: Store,
}

impl SeaOrmTokenService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenService for SeaOrmTokenService {
    async fn issue_or_get(&self, account_id: i32) -> Result<String, AccountError> {
        let key = self.store.issue_or_get_token(account_id).await?;
        Ok(key)
    }

    async fn resolve(&self, key: &str) -> Result<AccountInfo, AccountError> {
        let account = self
            .store
            .resolve_token(key)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !account.is_active {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(AccountInfo {
            id: account.id,
            email: account.email,
            name: account.name,
            is_active: account.is_active,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            created_at: account.created_at,
            updated_at: account.updated_at,
        })
    }
}
