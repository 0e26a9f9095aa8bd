use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{
    Attribute, AttributeKind, Recipe, RecipeDraft, RecipeWithLinks, User,
};
use crate::database::store::{Store, StoreError};
use crate::filter::{AttributeFilter, RecipeFilter};

const RECIPE_COLUMNS: &str = "id, user_id, title, time_minutes, price, link";

#[derive(Debug, FromRow)]
struct LinkRow {
    recipe_id: i64,
    id: i64,
    user_id: Uuid,
    name: String,
}

/// `Store` backed by PostgreSQL. Table names come from `AttributeKind`,
/// never from request input, so they are safe to format into SQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attributes linked to each of `recipe_ids`, keyed by recipe id
    async fn load_links<'e, E>(
        executor: E,
        kind: AttributeKind,
        recipe_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Attribute>>, StoreError>
    where
        E: PgExecutor<'e>,
    {
        let mut out: HashMap<i64, Vec<Attribute>> = HashMap::new();
        if recipe_ids.is_empty() {
            return Ok(out);
        }

        let sql = format!(
            "SELECT l.recipe_id, a.id, a.user_id, a.name \
             FROM {link} l JOIN {table} a ON a.id = l.{col} \
             WHERE l.recipe_id = ANY($1) \
             ORDER BY a.id",
            link = kind.link_table(),
            table = kind.table(),
            col = kind.link_column(),
        );
        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(recipe_ids)
            .fetch_all(executor)
            .await
            .map_err(StoreError::from_driver)?;

        for row in rows {
            out.entry(row.recipe_id).or_default().push(Attribute {
                id: row.id,
                user_id: row.user_id,
                name: row.name,
            });
        }
        Ok(out)
    }

    async fn hydrate(
        conn: &mut PgConnection,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeWithLinks>, StoreError> {
        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let mut ingredients = Self::load_links(&mut *conn, AttributeKind::Ingredient, &ids).await?;
        let mut tags = Self::load_links(&mut *conn, AttributeKind::Tag, &ids).await?;

        Ok(recipes
            .into_iter()
            .map(|recipe| RecipeWithLinks {
                ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                tags: tags.remove(&recipe.id).unwrap_or_default(),
                recipe,
            })
            .collect())
    }

    async fn check_references(
        conn: &mut PgConnection,
        owner: Uuid,
        draft: &RecipeDraft,
    ) -> Result<(), StoreError> {
        for kind in [AttributeKind::Ingredient, AttributeKind::Tag] {
            let wanted = draft.link_ids(kind);
            if wanted.is_empty() {
                continue;
            }

            let sql = format!(
                "SELECT id FROM {} WHERE user_id = $1 AND id = ANY($2)",
                kind.table()
            );
            let found: Vec<i64> = sqlx::query_scalar(&sql)
                .bind(owner)
                .bind(wanted)
                .fetch_all(&mut *conn)
                .await
                .map_err(StoreError::from_driver)?;

            if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
                return Err(StoreError::UnknownReference { kind, id: *missing });
            }
        }
        Ok(())
    }

    async fn write_links(
        conn: &mut PgConnection,
        recipe_id: i64,
        draft: &RecipeDraft,
    ) -> Result<(), StoreError> {
        for kind in [AttributeKind::Ingredient, AttributeKind::Tag] {
            let delete = format!("DELETE FROM {} WHERE recipe_id = $1", kind.link_table());
            sqlx::query(&delete)
                .bind(recipe_id)
                .execute(&mut *conn)
                .await
                .map_err(StoreError::from_driver)?;

            let ids = draft.link_ids(kind);
            if ids.is_empty() {
                continue;
            }
            let insert = format!(
                "INSERT INTO {} (recipe_id, {}) SELECT $1, UNNEST($2::bigint[])",
                kind.link_table(),
                kind.link_column()
            );
            sqlx::query(&insert)
                .bind(recipe_id)
                .bind(ids)
                .execute(&mut *conn)
                .await
                .map_err(StoreError::from_driver)?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_driver)?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_driver)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, is_active, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_driver)
    }

    async fn create_user(&self, email: &str, name: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, is_active, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_driver)
    }

    async fn list_attributes(
        &self,
        filter: &AttributeFilter,
    ) -> Result<Vec<Attribute>, StoreError> {
        // Same policy as AttributeFilter::apply; COLLATE "C" keeps the byte-wise order
        let sql = format!(
            r#"
            SELECT a.id, a.user_id, a.name
            FROM {table} a
            WHERE a.user_id = $1
              AND (NOT $2 OR EXISTS (
                  SELECT 1 FROM {link} l
                  JOIN recipes r ON r.id = l.recipe_id
                  WHERE l.{col} = a.id AND r.user_id = $1
              ))
            ORDER BY a.name COLLATE "C" DESC, a.id DESC
            "#,
            table = filter.kind.table(),
            link = filter.kind.link_table(),
            col = filter.kind.link_column(),
        );

        let rows = sqlx::query_as::<_, Attribute>(&sql)
            .bind(filter.owner)
            .bind(filter.assigned_only)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_driver)?;

        debug!("{} rows from {}", rows.len(), filter.kind.table());
        Ok(rows)
    }

    async fn get_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<Attribute>, StoreError> {
        let sql = format!(
            "SELECT id, user_id, name FROM {} WHERE id = $1 AND user_id = $2",
            kind.table()
        );
        sqlx::query_as::<_, Attribute>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_driver)
    }

    async fn create_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        name: &str,
    ) -> Result<Attribute, StoreError> {
        let sql = format!(
            "INSERT INTO {} (user_id, name) VALUES ($1, $2) RETURNING id, user_id, name",
            kind.table()
        );
        sqlx::query_as::<_, Attribute>(&sql)
            .bind(owner)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_driver)
    }

    async fn rename_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
        name: &str,
    ) -> Result<Option<Attribute>, StoreError> {
        let sql = format!(
            "UPDATE {} SET name = $3 WHERE id = $1 AND user_id = $2 RETURNING id, user_id, name",
            kind.table()
        );
        sqlx::query_as::<_, Attribute>(&sql)
            .bind(id)
            .bind(owner)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_driver)
    }

    async fn delete_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
    ) -> Result<bool, StoreError> {
        // Links go with it through ON DELETE CASCADE
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_driver)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_recipes(
        &self,
        filter: &RecipeFilter,
    ) -> Result<Vec<RecipeWithLinks>, StoreError> {
        let sql = format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes r
            WHERE r.user_id = $1
              AND ($2::bigint[] IS NULL OR EXISTS (
                  SELECT 1 FROM recipe_tags rt
                  WHERE rt.recipe_id = r.id AND rt.tag_id = ANY($2)
              ))
              AND ($3::bigint[] IS NULL OR EXISTS (
                  SELECT 1 FROM recipe_ingredients ri
                  WHERE ri.recipe_id = r.id AND ri.ingredient_id = ANY($3)
              ))
            ORDER BY r.id DESC
            "#
        );

        let mut conn = self.pool.acquire().await.map_err(StoreError::from_driver)?;
        let recipes = sqlx::query_as::<_, Recipe>(&sql)
            .bind(filter.owner)
            .bind(filter.tags.as_deref())
            .bind(filter.ingredients.as_deref())
            .fetch_all(&mut *conn)
            .await
            .map_err(StoreError::from_driver)?;

        Self::hydrate(&mut conn, recipes).await
    }

    async fn get_recipe(
        &self,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<RecipeWithLinks>, StoreError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2");

        let mut conn = self.pool.acquire().await.map_err(StoreError::from_driver)?;
        let recipe = sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut *conn)
            .await
            .map_err(StoreError::from_driver)?;

        match recipe {
            Some(recipe) => Ok(Self::hydrate(&mut conn, vec![recipe]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_recipe(
        &self,
        owner: Uuid,
        draft: &RecipeDraft,
    ) -> Result<RecipeWithLinks, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from_driver)?;
        Self::check_references(&mut tx, owner, draft).await?;

        let sql = format!(
            "INSERT INTO recipes (user_id, title, time_minutes, price, link) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {RECIPE_COLUMNS}"
        );
        let recipe = sqlx::query_as::<_, Recipe>(&sql)
            .bind(owner)
            .bind(&draft.title)
            .bind(draft.time_minutes)
            .bind(draft.price)
            .bind(&draft.link)
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::from_driver)?;

        Self::write_links(&mut tx, recipe.id, draft).await?;
        let mut hydrated = Self::hydrate(&mut tx, vec![recipe]).await?;
        tx.commit().await.map_err(StoreError::from_driver)?;

        hydrated
            .pop()
            .ok_or_else(|| StoreError::Sqlx(sqlx::Error::RowNotFound))
    }

    async fn update_recipe(
        &self,
        owner: Uuid,
        id: i64,
        draft: &RecipeDraft,
    ) -> Result<Option<RecipeWithLinks>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from_driver)?;

        let sql = format!(
            "UPDATE recipes SET title = $3, time_minutes = $4, price = $5, link = $6 \
             WHERE id = $1 AND user_id = $2 RETURNING {RECIPE_COLUMNS}"
        );
        let recipe = sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .bind(owner)
            .bind(&draft.title)
            .bind(draft.time_minutes)
            .bind(draft.price)
            .bind(&draft.link)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::from_driver)?;

        // Dropping the transaction rolls back on every early return below
        let Some(recipe) = recipe else {
            return Ok(None);
        };
        Self::check_references(&mut tx, owner, draft).await?;
        Self::write_links(&mut tx, recipe.id, draft).await?;

        let mut hydrated = Self::hydrate(&mut tx, vec![recipe]).await?;
        tx.commit().await.map_err(StoreError::from_driver)?;
        Ok(hydrated.pop())
    }

    async fn delete_recipe(&self, owner: Uuid, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_driver)?;
        Ok(result.rows_affected() > 0)
    }
}
