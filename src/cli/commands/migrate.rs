use anyhow::Context;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config;
use crate::database::manager::MIGRATOR;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config::config().database)
        .await
        .context("could not connect to the database (is DATABASE_URL set?)")?;

    DatabaseManager::migrate(&pool)
        .await
        .context("migration failed")?;

    let latest = MIGRATOR.iter().map(|m| m.version).max();
    output_success(
        &output_format,
        "Database is up to date",
        Some(json!({ "latest_version": latest })),
    )
}
