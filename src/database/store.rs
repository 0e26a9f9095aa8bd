use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Attribute, AttributeKind, RecipeDraft, RecipeWithLinks, User};
use crate::filter::{AttributeFilter, RecipeFilter};

/// Errors surfaced by any `Store` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{} {id} does not exist", .kind.label())]
    UnknownReference { kind: AttributeKind, id: i64 },

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a driver error: pool/IO failures mean the store is unreachable.
    pub fn from_driver(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::ConnectionError(err.to_string())
            }
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            other => StoreError::Sqlx(other),
        }
    }
}

/// Persistence boundary for users, ingredients, tags and recipes.
///
/// Every entity method takes the owning user; implementations must never
/// read or write rows belonging to a different owner. Lookups of ids the
/// owner does not hold return `None`/`false` exactly like missing ids.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, email: &str, name: &str) -> Result<User, StoreError>;

    async fn list_attributes(&self, filter: &AttributeFilter) -> Result<Vec<Attribute>, StoreError>;
    async fn get_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<Attribute>, StoreError>;
    async fn create_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        name: &str,
    ) -> Result<Attribute, StoreError>;
    async fn rename_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
        name: &str,
    ) -> Result<Option<Attribute>, StoreError>;
    /// Removes the attribute and every recipe link pointing at it
    async fn delete_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
    ) -> Result<bool, StoreError>;

    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<RecipeWithLinks>, StoreError>;
    async fn get_recipe(&self, owner: Uuid, id: i64) -> Result<Option<RecipeWithLinks>, StoreError>;
    /// Fails with `UnknownReference` (and writes nothing) when a linked id is
    /// not an attribute of the same owner.
    async fn create_recipe(
        &self,
        owner: Uuid,
        draft: &RecipeDraft,
    ) -> Result<RecipeWithLinks, StoreError>;
    /// Replaces all fields and links; same reference rules as `create_recipe`.
    async fn update_recipe(
        &self,
        owner: Uuid,
        id: i64,
        draft: &RecipeDraft,
    ) -> Result<Option<RecipeWithLinks>, StoreError>;
    async fn delete_recipe(&self, owner: Uuid, id: i64) -> Result<bool, StoreError>;
}
