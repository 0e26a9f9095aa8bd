use tracing::{debug, info};

use super::ServiceError;
use crate::auth::Principal;
use crate::database::models::{Attribute, AttributeKind};
use crate::database::store::Store;
use crate::filter::AttributeFilter;
use crate::serializers::AttributePayload;

/// Owner-scoped operations on ingredients or tags
pub struct AttributeService<'a> {
    store: &'a dyn Store,
    kind: AttributeKind,
}

impl<'a> AttributeService<'a> {
    pub fn new(store: &'a dyn Store, kind: AttributeKind) -> Self {
        Self { store, kind }
    }

    /// Entries owned by `principal`, name descending
    pub async fn list(
        &self,
        principal: &Principal,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, ServiceError> {
        let filter = AttributeFilter::new(self.kind, principal.id).assigned_only(assigned_only);
        let rows = self.store.list_attributes(&filter).await?;
        debug!(
            "Listed {} {} for {} (assigned_only={})",
            rows.len(),
            self.kind.table(),
            principal.id,
            assigned_only
        );
        Ok(rows)
    }

    pub async fn get(&self, principal: &Principal, id: i64) -> Result<Attribute, ServiceError> {
        self.store
            .get_attribute(self.kind, principal.id, id)
            .await?
            .ok_or(ServiceError::NotFound(self.kind.label()))
    }

    pub async fn create(
        &self,
        principal: &Principal,
        payload: &AttributePayload,
    ) -> Result<Attribute, ServiceError> {
        let name = payload.validate()?;
        let created = self
            .store
            .create_attribute(self.kind, principal.id, &name)
            .await?;
        info!(
            "Created {} {} for {}",
            self.kind.label().to_lowercase(),
            created.id,
            principal.id
        );
        Ok(created)
    }

    /// PUT requires a name; PATCH (`partial`) may omit it and leave the row as is.
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        payload: &AttributePayload,
        partial: bool,
    ) -> Result<Attribute, ServiceError> {
        let name = if partial {
            payload.validate_partial()?
        } else {
            Some(payload.validate()?)
        };

        let updated = match name {
            Some(name) => {
                self.store
                    .rename_attribute(self.kind, principal.id, id, &name)
                    .await?
            }
            None => self.store.get_attribute(self.kind, principal.id, id).await?,
        };
        updated.ok_or(ServiceError::NotFound(self.kind.label()))
    }

    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        if self.store.delete_attribute(self.kind, principal.id, id).await? {
            info!(
                "Deleted {} {} for {}",
                self.kind.label().to_lowercase(),
                id,
                principal.id
            );
            Ok(())
        } else {
            Err(ServiceError::NotFound(self.kind.label()))
        }
    }
}
