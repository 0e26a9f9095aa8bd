use std::cmp::Ordering;

use uuid::Uuid;

use crate::database::models::{Attribute, AttributeKind, RecipeWithLinks};

/// Scoped listing of ingredients or tags for one owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub kind: AttributeKind,
    pub owner: Uuid,
    /// Only keep entries referenced by at least one of the owner's recipes
    pub assigned_only: bool,
}

impl AttributeFilter {
    pub fn new(kind: AttributeKind, owner: Uuid) -> Self {
        Self {
            kind,
            owner,
            assigned_only: false,
        }
    }

    pub fn assigned_only(mut self, assigned_only: bool) -> Self {
        self.assigned_only = assigned_only;
        self
    }

    pub fn owns(&self, attribute: &Attribute) -> bool {
        attribute.user_id == self.owner
    }

    /// True when `recipe` counts as an assignment for this filter: it must
    /// belong to the same owner and reference the attribute.
    pub fn is_assigned_by(&self, attribute: &Attribute, recipe: &RecipeWithLinks) -> bool {
        recipe.recipe.user_id == self.owner && recipe.references(self.kind, attribute.id)
    }

    /// `assigned` reports whether any recipe links the attribute (see `is_assigned_by`).
    pub fn matches(&self, attribute: &Attribute, assigned: bool) -> bool {
        self.owns(attribute) && (!self.assigned_only || assigned)
    }

    /// Apply the filter and the listing order to an arbitrary candidate set.
    pub fn apply<'a, I>(&self, candidates: I, recipes: &[RecipeWithLinks]) -> Vec<Attribute>
    where
        I: IntoIterator<Item = &'a Attribute>,
    {
        let mut out: Vec<Attribute> = candidates
            .into_iter()
            .filter(|a| {
                let assigned = self.assigned_only
                    && recipes.iter().any(|r| self.is_assigned_by(a, r));
                self.matches(a, assigned)
            })
            .cloned()
            .collect();
        out.sort_by(order_by_name_desc);
        out
    }
}

/// Listing order: name descending (byte-wise), then id descending.
pub fn order_by_name_desc(a: &Attribute, b: &Attribute) -> Ordering {
    b.name.cmp(&a.name).then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Recipe;
    use rust_decimal::Decimal;

    fn attr(id: i64, owner: Uuid, name: &str) -> Attribute {
        Attribute {
            id,
            user_id: owner,
            name: name.to_string(),
        }
    }

    fn recipe(owner: Uuid, ingredients: Vec<Attribute>) -> RecipeWithLinks {
        RecipeWithLinks {
            recipe: Recipe {
                id: 1,
                user_id: owner,
                title: "Sample".to_string(),
                time_minutes: 5,
                price: Decimal::new(500, 2),
                link: String::new(),
            },
            ingredients,
            tags: vec![],
        }
    }

    #[test]
    fn orders_by_name_descending() {
        let owner = Uuid::new_v4();
        let rows = vec![attr(1, owner, "Kale"), attr(2, owner, "Salt")];
        let out = AttributeFilter::new(AttributeKind::Ingredient, owner).apply(&rows, &[]);
        let names: Vec<_> = out.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Salt", "Kale"]);
    }

    #[test]
    fn equal_names_break_ties_by_id() {
        let owner = Uuid::new_v4();
        let rows = vec![attr(1, owner, "Salt"), attr(7, owner, "Salt")];
        let out = AttributeFilter::new(AttributeKind::Tag, owner).apply(&rows, &[]);
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![7, 1]);
    }

    #[test]
    fn excludes_other_owners() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let rows = vec![attr(1, other, "Vinegar"), attr(2, me, "Turmeric")];
        let out = AttributeFilter::new(AttributeKind::Ingredient, me).apply(&rows, &[]);
        assert_eq!(out, vec![attr(2, me, "Turmeric")]);
    }

    #[test]
    fn assigned_only_keeps_linked_entries() {
        let owner = Uuid::new_v4();
        let breakfast = attr(1, owner, "Breakfast");
        let lunch = attr(2, owner, "Lunch");
        let rows = vec![breakfast.clone(), lunch.clone()];
        let recipes = vec![recipe(owner, vec![breakfast.clone()])];

        let filter = AttributeFilter::new(AttributeKind::Ingredient, owner);
        assert_eq!(filter.apply(&rows, &recipes).len(), 2);

        let out = filter.assigned_only(true).apply(&rows, &recipes);
        assert_eq!(out, vec![breakfast]);
    }

    #[test]
    fn assignment_by_foreign_recipe_does_not_count() {
        let owner = Uuid::new_v4();
        let breakfast = attr(1, owner, "Breakfast");
        let recipes = vec![recipe(Uuid::new_v4(), vec![breakfast.clone()])];

        let out = AttributeFilter::new(AttributeKind::Ingredient, owner)
            .assigned_only(true)
            .apply(&[breakfast], &recipes);
        assert!(out.is_empty());
    }

    #[test]
    fn assignment_checks_the_right_kind() {
        let owner = Uuid::new_v4();
        let thing = attr(1, owner, "Vegan");
        let recipes = vec![recipe(owner, vec![thing.clone()])];

        // Linked as an ingredient, not as a tag
        let out = AttributeFilter::new(AttributeKind::Tag, owner)
            .assigned_only(true)
            .apply(&[thing], &recipes);
        assert!(out.is_empty());
    }
}
