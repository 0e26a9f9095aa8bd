pub mod migrate;
pub mod user;

use anyhow::Context;

use crate::config;
use crate::database::{DatabaseManager, PgStore};

/// CLI commands always talk to PostgreSQL; the in-process store would be gone on exit.
pub(crate) async fn open_pg_store() -> anyhow::Result<PgStore> {
    let pool = DatabaseManager::connect(&config::config().database)
        .await
        .context("could not connect to the database (is DATABASE_URL set?)")?;
    Ok(PgStore::new(pool))
}
