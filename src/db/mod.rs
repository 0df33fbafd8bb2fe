use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;

pub mod migrator;
pub mod repositories;

pub use repositories::account::{Account, CreateOutcome, NewAccountRow};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with("sqlite::memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    #[must_use]
    pub fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    pub async fn create_account(
        &self,
        row: NewAccountRow,
        config: &SecurityConfig,
    ) -> Result<CreateOutcome> {
        self.account_repo().create(row, config).await
    }

    pub async fn get_account_by_id(&self, id: i32) -> Result<Option<Account>> {
        self.account_repo().get_by_id(id).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.account_repo().list().await
    }

    pub async fn verify_account_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        self.account_repo().verify_password(email, password).await
    }

    pub async fn update_account_profile(
        &self,
        id: i32,
        name: Option<String>,
        password: Option<String>,
        config: &SecurityConfig,
    ) -> Result<Option<Account>> {
        self.account_repo()
            .update_profile(id, name, password, config)
            .await
    }

    pub async fn issue_or_get_token(&self, account_id: i32) -> Result<String> {
        self.token_repo().issue_or_get(account_id).await
    }

    pub async fn resolve_token(&self, key: &str) -> Result<Option<Account>> {
        self.token_repo().resolve(key).await
    }
}
