use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::attribute::{Attribute, AttributeKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
}

/// A recipe together with the ingredients and tags it references
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeWithLinks {
    pub recipe: Recipe,
    pub ingredients: Vec<Attribute>,
    pub tags: Vec<Attribute>,
}

impl RecipeWithLinks {
    pub fn links(&self, kind: AttributeKind) -> &[Attribute] {
        match kind {
            AttributeKind::Ingredient => &self.ingredients,
            AttributeKind::Tag => &self.tags,
        }
    }

    pub fn references(&self, kind: AttributeKind, id: i64) -> bool {
        self.links(kind).iter().any(|a| a.id == id)
    }
}

/// Validated recipe fields ready to be written. Link ids are deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub ingredients: Vec<i64>,
    pub tags: Vec<i64>,
}

impl RecipeDraft {
    pub fn link_ids(&self, kind: AttributeKind) -> &[i64] {
        match kind {
            AttributeKind::Ingredient => &self.ingredients,
            AttributeKind::Tag => &self.tags,
        }
    }
}
