use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::accounts;

/// Account data returned from repository (without sensitive password hash)
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Field set accepted by [`AccountRepository::create`]. Email must already be
/// normalized and validated; the password arrives in plaintext and is hashed
/// here before anything touches the database.
#[derive(Debug, Clone)]
pub struct NewAccountRow {
    pub email: String,
    pub password: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Outcome of an insert attempt. Duplicate emails surface as a value rather
/// than an error so callers can map them to a validation failure without
/// string-matching database errors.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(Account),
    DuplicateEmail,
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new account. The unique index on `email` is the arbiter under
    /// concurrency: two simultaneous inserts with the same email end with
    /// exactly one `Created` and one `DuplicateEmail`.
    pub async fn create(
        &self,
        row: NewAccountRow,
        config: &SecurityConfig,
    ) -> Result<CreateOutcome> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(&row.email))
            .one(&self.conn)
            .await
            .context("Failed to check for existing account")?;

        if existing.is_some() {
            return Ok(CreateOutcome::DuplicateEmail);
        }

        let password = row.password;
        let config_clone = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config_clone))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let active = accounts::ActiveModel {
            email: Set(row.email),
            password_hash: Set(password_hash),
            name: Set(row.name),
            is_active: Set(row.is_active),
            is_staff: Set(row.is_staff),
            is_superuser: Set(row.is_superuser),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(CreateOutcome::Created(Account::from(model))),
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Ok(CreateOutcome::DuplicateEmail)
                } else {
                    Err(err).context("Failed to insert account")
                }
            }
        }
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Account>> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account by ID")?;

        Ok(account.map(Account::from))
    }

    /// List all accounts, oldest first. Used by the admin surface.
    pub async fn list(&self) -> Result<Vec<Account>> {
        let rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list accounts")?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Verify a password for an email and return the account on a match.
    /// Unknown email and wrong password are indistinguishable to the caller.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<Account>> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query account for password verification")?;

        let Some(account) = account else {
            return Ok(None);
        };

        let password_hash = account.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| Account::from(account)))
    }

    /// Apply a partial profile update. Omitted fields are left untouched; a
    /// supplied password is re-hashed. Returns the updated account, or None
    /// if the id no longer exists.
    pub async fn update_profile(
        &self,
        id: i32,
        name: Option<String>,
        password: Option<String>,
        config: &SecurityConfig,
    ) -> Result<Option<Account>> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account for profile update")?;

        let Some(account) = account else {
            return Ok(None);
        };

        let mut active: accounts::ActiveModel = account.into();

        if let Some(name) = name {
            active.name = Set(name);
        }

        if let Some(password) = password {
            let config_clone = config.clone();
            let new_hash = task::spawn_blocking(move || hash_password(&password, &config_clone))
                .await
                .context("Password hashing task panicked")??;
            active.password_hash = Set(new_hash);
        }

        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update account profile")?;

        Ok(Some(Account::from(updated)))
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_verifies_roundtrip() {
        let config = SecurityConfig {
            // Low cost keeps the test fast; the shape of the hash is what matters.
            argon2_memory_cost_kib: 64,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            min_password_length: 5,
        };

        let hash = hash_password("testPassword", &config).unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"testPassword", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrongPassword", &parsed)
                .is_err()
        );
    }
}
