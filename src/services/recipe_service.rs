use tracing::{debug, info};

use super::ServiceError;
use crate::auth::Principal;
use crate::database::models::RecipeWithLinks;
use crate::database::store::Store;
use crate::filter::RecipeFilter;
use crate::serializers::RecipePayload;

const RECIPE: &str = "Recipe";

/// Owner-scoped recipe operations
pub struct RecipeService<'a> {
    store: &'a dyn Store,
}

impl<'a> RecipeService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// `filter` must already be scoped to `principal`; the owner is forced here regardless.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: RecipeFilter,
    ) -> Result<Vec<RecipeWithLinks>, ServiceError> {
        let filter = RecipeFilter {
            owner: principal.id,
            ..filter
        };
        let rows = self.store.list_recipes(&filter).await?;
        debug!("Listed {} recipes for {}", rows.len(), principal.id);
        Ok(rows)
    }

    pub async fn get(
        &self,
        principal: &Principal,
        id: i64,
    ) -> Result<RecipeWithLinks, ServiceError> {
        self.store
            .get_recipe(principal.id, id)
            .await?
            .ok_or(ServiceError::NotFound(RECIPE))
    }

    pub async fn create(
        &self,
        principal: &Principal,
        payload: RecipePayload,
    ) -> Result<RecipeWithLinks, ServiceError> {
        let draft = payload.into_draft()?;
        let created = self.store.create_recipe(principal.id, &draft).await?;
        info!("Created recipe {} for {}", created.recipe.id, principal.id);
        Ok(created)
    }

    /// Full update (PUT) validates every field; partial (PATCH) merges onto
    /// the stored recipe first.
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        payload: RecipePayload,
        partial: bool,
    ) -> Result<RecipeWithLinks, ServiceError> {
        let draft = if partial {
            let current = self.get(principal, id).await?;
            payload.merge_into(&current)?
        } else {
            payload.into_draft()?
        };

        self.store
            .update_recipe(principal.id, id, &draft)
            .await?
            .ok_or(ServiceError::NotFound(RECIPE))
    }

    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        if self.store.delete_recipe(principal.id, id).await? {
            info!("Deleted recipe {} for {}", id, principal.id);
            Ok(())
        } else {
            Err(ServiceError::NotFound(RECIPE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::AttributeKind;
    use crate::database::store::StoreError;
    use crate::database::MemoryStore;
    use serde_json::json;
    use uuid::Uuid;

    fn principal() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "chef@example.com".to_string(),
            name: "Chef".to_string(),
        }
    }

    fn payload(value: serde_json::Value) -> RecipePayload {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn list_is_forced_to_the_principal() {
        let store = MemoryStore::new();
        let service = RecipeService::new(&store);
        let me = principal();
        let other = principal();
        service
            .create(
                &other,
                payload(json!({ "title": "Theirs", "time_minutes": 1, "price": "1.00" })),
            )
            .await
            .unwrap();

        // A filter scoped to someone else is still answered for `me`
        let rows = service.list(&me, RecipeFilter::new(other.id)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn foreign_ingredient_is_a_store_reference_error() {
        let store = MemoryStore::new();
        let service = RecipeService::new(&store);
        let me = principal();
        let theirs = store
            .create_attribute(AttributeKind::Ingredient, Uuid::new_v4(), "Truffle")
            .await
            .unwrap();

        let err = service
            .create(
                &me,
                payload(json!({
                    "title": "Pasta",
                    "time_minutes": 10,
                    "price": "9.99",
                    "ingredients": [theirs.id]
                })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::UnknownReference { .. })));
    }

    #[tokio::test]
    async fn patch_merges_and_put_replaces() {
        let store = MemoryStore::new();
        let service = RecipeService::new(&store);
        let me = principal();
        let created = service
            .create(
                &me,
                payload(json!({
                    "title": "Stew",
                    "time_minutes": 60,
                    "price": "7.00",
                    "link": "x",
                })),
            )
            .await
            .unwrap();
        let id = created.recipe.id;

        let patched = service
            .update(&me, id, payload(json!({ "title": "Beef stew" })), true)
            .await
            .unwrap();
        assert_eq!(patched.recipe.title, "Beef stew");
        assert_eq!(patched.recipe.time_minutes, 60);
        assert_eq!(patched.recipe.link, "x");

        let replaced = service
            .update(
                &me,
                id,
                payload(json!({ "title": "Soup", "time_minutes": 5, "price": "2.00" })),
                false,
            )
            .await
            .unwrap();
        assert_eq!(replaced.recipe.link, "");

        let err = service
            .update(&me, id, payload(json!({ "title": "Soup" })), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_is_scoped() {
        let store = MemoryStore::new();
        let service = RecipeService::new(&store);
        let me = principal();
        let created = service
            .create(&me, payload(json!({ "title": "Salad", "time_minutes": 5, "price": "3.00" })))
            .await
            .unwrap();

        assert!(matches!(
            service.delete(&principal(), created.recipe.id).await,
            Err(ServiceError::NotFound(_))
        ));
        service.delete(&me, created.recipe.id).await.unwrap();
        assert!(matches!(
            service.get(&me, created.recipe.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
