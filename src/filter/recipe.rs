use std::cmp::Ordering;

use uuid::Uuid;

use crate::database::models::{AttributeKind, RecipeWithLinks};

/// Scoped listing of recipes for one owner.
/// Each id filter, when present, requires at least one matching link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub owner: Uuid,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

impl RecipeFilter {
    pub fn new(owner: Uuid) -> Self {
        Self {
            owner,
            tags: None,
            ingredients: None,
        }
    }

    pub fn tags(mut self, tags: Option<Vec<i64>>) -> Self {
        self.tags = tags;
        self
    }

    pub fn ingredients(mut self, ingredients: Option<Vec<i64>>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn ids(&self, kind: AttributeKind) -> Option<&[i64]> {
        match kind {
            AttributeKind::Ingredient => self.ingredients.as_deref(),
            AttributeKind::Tag => self.tags.as_deref(),
        }
    }

    pub fn matches(&self, recipe: &RecipeWithLinks) -> bool {
        recipe.recipe.user_id == self.owner
            && [AttributeKind::Tag, AttributeKind::Ingredient]
                .into_iter()
                .all(|kind| match self.ids(kind) {
                    Some(ids) => ids.iter().any(|id| recipe.references(kind, *id)),
                    None => true,
                })
    }

    pub fn apply<'a, I>(&self, candidates: I) -> Vec<RecipeWithLinks>
    where
        I: IntoIterator<Item = &'a RecipeWithLinks>,
    {
        let mut out: Vec<RecipeWithLinks> = candidates
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        out.sort_by(order_by_id_desc);
        out
    }
}

/// Newest recipe first
pub fn order_by_id_desc(a: &RecipeWithLinks, b: &RecipeWithLinks) -> Ordering {
    b.recipe.id.cmp(&a.recipe.id)
}
