use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{
    Attribute, AttributeKind, Recipe, RecipeDraft, RecipeWithLinks, User,
};
use crate::database::store::{Store, StoreError};
use crate::filter::{AttributeFilter, RecipeFilter};

#[derive(Debug, Clone)]
struct StoredRecipe {
    recipe: Recipe,
    ingredients: Vec<i64>,
    tags: Vec<i64>,
}

impl StoredRecipe {
    fn links_mut(&mut self, kind: AttributeKind) -> &mut Vec<i64> {
        match kind {
            AttributeKind::Ingredient => &mut self.ingredients,
            AttributeKind::Tag => &mut self.tags,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    attributes: HashMap<AttributeKind, Vec<Attribute>>,
    recipes: Vec<StoredRecipe>,
    sequences: HashMap<&'static str, i64>,
}

impl Inner {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }

    fn attributes(&self, kind: AttributeKind) -> &[Attribute] {
        self.attributes.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    fn resolve(&self, kind: AttributeKind, ids: &[i64]) -> Vec<Attribute> {
        let mut out: Vec<Attribute> = self
            .attributes(kind)
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect();
        out.sort_by_key(|a| a.id);
        out
    }

    fn hydrate(&self, stored: &StoredRecipe) -> RecipeWithLinks {
        RecipeWithLinks {
            recipe: stored.recipe.clone(),
            ingredients: self.resolve(AttributeKind::Ingredient, &stored.ingredients),
            tags: self.resolve(AttributeKind::Tag, &stored.tags),
        }
    }

    fn owned_recipes(&self, owner: Uuid) -> Vec<RecipeWithLinks> {
        self.recipes
            .iter()
            .filter(|r| r.recipe.user_id == owner)
            .map(|r| self.hydrate(r))
            .collect()
    }

    /// Every linked id must name an attribute of the same owner
    fn check_references(&self, owner: Uuid, draft: &RecipeDraft) -> Result<(), StoreError> {
        for kind in [AttributeKind::Ingredient, AttributeKind::Tag] {
            for id in draft.link_ids(kind) {
                let owned = self
                    .attributes(kind)
                    .iter()
                    .any(|a| a.id == *id && a.user_id == owner);
                if !owned {
                    return Err(StoreError::UnknownReference { kind, id: *id });
                }
            }
        }
        Ok(())
    }
}

/// In-process `Store` used by tests and by development runs without a database.
/// Writes are serialised through a single lock, so each call is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, email: &str, name: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict(format!("user {email} already exists")));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn list_attributes(
        &self,
        filter: &AttributeFilter,
    ) -> Result<Vec<Attribute>, StoreError> {
        let inner = self.inner.read().await;
        let recipes = if filter.assigned_only {
            inner.owned_recipes(filter.owner)
        } else {
            Vec::new()
        };
        let out = filter.apply(inner.attributes(filter.kind), &recipes);
        debug!("memory store: {} {} rows", out.len(), filter.kind.table());
        Ok(out)
    }

    async fn get_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<Attribute>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .attributes(kind)
            .iter()
            .find(|a| a.id == id && a.user_id == owner)
            .cloned())
    }

    async fn create_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        name: &str,
    ) -> Result<Attribute, StoreError> {
        let mut inner = self.inner.write().await;
        let attribute = Attribute {
            id: inner.next_id(kind.table()),
            user_id: owner,
            name: name.to_string(),
        };
        inner.attributes.entry(kind).or_default().push(attribute.clone());
        Ok(attribute)
    }

    async fn rename_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
        name: &str,
    ) -> Result<Option<Attribute>, StoreError> {
        let mut inner = self.inner.write().await;
        let found = inner
            .attributes
            .entry(kind)
            .or_default()
            .iter_mut()
            .find(|a| a.id == id && a.user_id == owner)
            .map(|a| {
                a.name = name.to_string();
                a.clone()
            });
        Ok(found)
    }

    async fn delete_attribute(
        &self,
        kind: AttributeKind,
        owner: Uuid,
        id: i64,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let rows = inner.attributes.entry(kind).or_default();
        let before = rows.len();
        rows.retain(|a| !(a.id == id && a.user_id == owner));
        if rows.len() == before {
            return Ok(false);
        }

        for recipe in inner.recipes.iter_mut() {
            recipe.links_mut(kind).retain(|linked| *linked != id);
        }
        Ok(true)
    }

    async fn list_recipes(
        &self,
        filter: &RecipeFilter,
    ) -> Result<Vec<RecipeWithLinks>, StoreError> {
        let inner = self.inner.read().await;
        let owned = inner.owned_recipes(filter.owner);
        Ok(filter.apply(&owned))
    }

    async fn get_recipe(
        &self,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<RecipeWithLinks>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .iter()
            .find(|r| r.recipe.id == id && r.recipe.user_id == owner)
            .map(|r| inner.hydrate(r)))
    }

    async fn create_recipe(
        &self,
        owner: Uuid,
        draft: &RecipeDraft,
    ) -> Result<RecipeWithLinks, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_references(owner, draft)?;

        let stored = StoredRecipe {
            recipe: Recipe {
                id: inner.next_id("recipes"),
                user_id: owner,
                title: draft.title.clone(),
                time_minutes: draft.time_minutes,
                price: draft.price,
                link: draft.link.clone(),
            },
            ingredients: draft.ingredients.clone(),
            tags: draft.tags.clone(),
        };
        let out = inner.hydrate(&stored);
        inner.recipes.push(stored);
        Ok(out)
    }

    async fn update_recipe(
        &self,
        owner: Uuid,
        id: i64,
        draft: &RecipeDraft,
    ) -> Result<Option<RecipeWithLinks>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(index) = inner
            .recipes
            .iter()
            .position(|r| r.recipe.id == id && r.recipe.user_id == owner)
        else {
            return Ok(None);
        };
        inner.check_references(owner, draft)?;

        let stored = &mut inner.recipes[index];
        stored.recipe.title = draft.title.clone();
        stored.recipe.time_minutes = draft.time_minutes;
        stored.recipe.price = draft.price;
        stored.recipe.link = draft.link.clone();
        stored.ingredients = draft.ingredients.clone();
        stored.tags = draft.tags.clone();

        let stored = inner.recipes[index].clone();
        Ok(Some(inner.hydrate(&stored)))
    }

    async fn delete_recipe(&self, owner: Uuid, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.recipes.len();
        inner
            .recipes
            .retain(|r| !(r.recipe.id == id && r.recipe.user_id == owner));
        Ok(inner.recipes.len() != before)
    }
}
