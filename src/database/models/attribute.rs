use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ingredients and tags share one shape: a named row owned by a user that
/// recipes link to through a join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Ingredient,
    Tag,
}

impl AttributeKind {
    pub fn table(&self) -> &'static str {
        match self {
            AttributeKind::Ingredient => "ingredients",
            AttributeKind::Tag => "tags",
        }
    }

    /// Join table linking recipes to this kind
    pub fn link_table(&self) -> &'static str {
        match self {
            AttributeKind::Ingredient => "recipe_ingredients",
            AttributeKind::Tag => "recipe_tags",
        }
    }

    pub fn link_column(&self) -> &'static str {
        match self {
            AttributeKind::Ingredient => "ingredient_id",
            AttributeKind::Tag => "tag_id",
        }
    }

    /// Field name used for this kind in recipe payloads
    pub fn field(&self) -> &'static str {
        self.table()
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttributeKind::Ingredient => "Ingredient",
            AttributeKind::Tag => "Tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Attribute {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
}
