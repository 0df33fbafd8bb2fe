use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::db::repositories::account::Account;
use crate::entities::{accounts, tokens};

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Return the account's token key, minting one if none exists yet.
    /// The unique index on `account_id` guarantees that two concurrent
    /// first-time calls agree on a single key: the losing insert re-reads.
    pub async fn issue_or_get(&self, account_id: i32) -> Result<String> {
        if let Some(existing) = self.find_by_account(account_id).await? {
            return Ok(existing.key);
        }

        let active = tokens::ActiveModel {
            key: Set(generate_token_key()),
            account_id: Set(account_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(model.key),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let token = self
                    .find_by_account(account_id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Token vanished after insert conflict"))?;
                Ok(token.key)
            }
            Err(err) => Err(err).context("Failed to insert token"),
        }
    }

    /// Resolve a token key to its owning account.
    pub async fn resolve(&self, key: &str) -> Result<Option<Account>> {
        let token = tokens::Entity::find()
            .filter(tokens::Column::Key.eq(key))
            .one(&self.conn)
            .await
            .context("Failed to query token by key")?;

        let Some(token) = token else {
            return Ok(None);
        };

        let account = accounts::Entity::find_by_id(token.account_id)
            .one(&self.conn)
            .await
            .context("Failed to query token owner")?;

        Ok(account.map(Account::from))
    }

    async fn find_by_account(&self, account_id: i32) -> Result<Option<tokens::Model>> {
        tokens::Entity::find()
            .filter(tokens::Column::AccountId.eq(account_id))
            .one(&self.conn)
            .await
            .context("Failed to query token by account")
    }
}

/// Generate a random token key (40 character hex string)
#[must_use]
pub fn generate_token_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 20] = rng.random();

    bytes.iter().fold(String::with_capacity(40), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
