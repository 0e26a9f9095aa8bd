use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::{AppConfig, DatabaseConfig};
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::store::{Store, StoreError};
use crate::services::{UserError, UserService};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Builds connection pools and picks the store implementation from config
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against `database.url`
    pub async fn connect(database: &DatabaseConfig) -> Result<PgPool, StoreError> {
        let url = database
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout))
            .connect(url)
            .await
            .map_err(StoreError::from_driver)?;

        info!(
            "Created database pool (max_connections={})",
            database.max_connections
        );
        Ok(pool)
    }

    pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
        MIGRATOR.run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// PostgreSQL when a URL is configured, otherwise the in-process store
    pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn Store>, StoreError> {
        if config.database.url.is_none() {
            warn!("DATABASE_URL not set; using in-process store (data is lost on restart)");
            let store = MemoryStore::new();
            match config.security.dev_user.as_deref() {
                Some(email) => {
                    let token = Self::seed_dev_user(&store, email).await?;
                    info!("Seeded development user {}; bearer token: {}", email, token);
                }
                None => warn!("RECIPE_DEV_USER not set; no user can authenticate"),
            }
            return Ok(Arc::new(store));
        }

        if config.security.dev_user.is_some() {
            warn!("RECIPE_DEV_USER ignored: users live in the database, use `recipe user create`");
        }

        let pool = Self::connect(&config.database).await?;
        if config.database.run_migrations {
            Self::migrate(&pool).await?;
        }
        Ok(Arc::new(PgStore::new(pool)))
    }

    /// Create (or reuse) `email` in `store` and return a bearer token for it
    pub async fn seed_dev_user(store: &dyn Store, email: &str) -> Result<String, StoreError> {
        let users = UserService::new(store);
        users
            .ensure_user(email, "Developer")
            .await
            .map_err(seed_error)?;
        users.issue_token(email).await.map_err(seed_error)
    }
}

fn seed_error(err: UserError) -> StoreError {
    match err {
        UserError::Store(e) => e,
        other => {
            warn!("Could not seed development user: {}", other);
            StoreError::ConfigMissing("a valid RECIPE_DEV_USER email")
        }
    }
}
