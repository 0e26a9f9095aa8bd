use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{clean_text, too_long, AttributeOut, FieldErrors, MAX_NAME_LENGTH, REQUIRED};
use crate::database::models::{RecipeDraft, RecipeWithLinks};

/// Largest price representable as NUMERIC(5, 2)
const PRICE_LIMIT: i64 = 1000;

fn display_price(price: Decimal) -> Decimal {
    let mut price = price;
    price.rescale(2);
    price
}

/// List representation: linked ingredients and tags as ids
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeOut {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub ingredients: Vec<i64>,
    pub tags: Vec<i64>,
}

impl From<&RecipeWithLinks> for RecipeOut {
    fn from(r: &RecipeWithLinks) -> Self {
        Self {
            id: r.recipe.id,
            title: r.recipe.title.clone(),
            time_minutes: r.recipe.time_minutes,
            price: display_price(r.recipe.price),
            link: r.recipe.link.clone(),
            ingredients: r.ingredients.iter().map(|a| a.id).collect(),
            tags: r.tags.iter().map(|a| a.id).collect(),
        }
    }
}

/// Detail representation: linked ingredients and tags nested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeDetailOut {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub ingredients: Vec<AttributeOut>,
    pub tags: Vec<AttributeOut>,
}

impl From<&RecipeWithLinks> for RecipeDetailOut {
    fn from(r: &RecipeWithLinks) -> Self {
        Self {
            id: r.recipe.id,
            title: r.recipe.title.clone(),
            time_minutes: r.recipe.time_minutes,
            price: display_price(r.recipe.price),
            link: r.recipe.link.clone(),
            ingredients: r.ingredients.iter().map(AttributeOut::from).collect(),
            tags: r.tags.iter().map(AttributeOut::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time_minutes: Option<i64>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<i64>>,
    #[serde(default)]
    pub tags: Option<Vec<i64>>,
}

impl RecipePayload {
    /// Create or full update: title, time_minutes and price are required.
    pub fn into_draft(self) -> Result<RecipeDraft, FieldErrors> {
        self.build(None)
    }

    /// Partial update: absent fields keep the value from `current`.
    pub fn merge_into(self, current: &RecipeWithLinks) -> Result<RecipeDraft, FieldErrors> {
        self.build(Some(current))
    }

    fn build(self, base: Option<&RecipeWithLinks>) -> Result<RecipeDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = match (&self.title, base) {
            (None, Some(current)) => Some(current.recipe.title.clone()),
            (title, _) => clean_text("title", title.as_deref(), &mut errors),
        };

        let time_minutes = match (self.time_minutes, base) {
            (None, Some(current)) => Some(current.recipe.time_minutes),
            (None, None) => {
                errors.insert("time_minutes".into(), REQUIRED.into());
                None
            }
            (Some(minutes), _) => match i32::try_from(minutes) {
                Ok(minutes) if minutes >= 0 => Some(minutes),
                Ok(_) => {
                    errors.insert(
                        "time_minutes".into(),
                        "Ensure this value is greater than or equal to 0.".into(),
                    );
                    None
                }
                Err(_) => {
                    errors.insert("time_minutes".into(), "A valid integer is required.".into());
                    None
                }
            },
        };

        let price = match (self.price, base) {
            (None, Some(current)) => Some(current.recipe.price),
            (None, None) => {
                errors.insert("price".into(), REQUIRED.into());
                None
            }
            (Some(price), _) => validate_price(price, &mut errors),
        };

        let link = match (self.link, base) {
            (None, Some(current)) => current.recipe.link.clone(),
            (None, None) => String::new(),
            (Some(link), _) => {
                let link = link.trim().to_string();
                if link.chars().count() > MAX_NAME_LENGTH {
                    errors.insert("link".into(), too_long(MAX_NAME_LENGTH));
                }
                link
            }
        };

        let ingredients = match (self.ingredients, base) {
            (None, Some(current)) => current.ingredients.iter().map(|a| a.id).collect(),
            (ids, _) => dedup(ids.unwrap_or_default()),
        };
        let tags = match (self.tags, base) {
            (None, Some(current)) => current.tags.iter().map(|a| a.id).collect(),
            (ids, _) => dedup(ids.unwrap_or_default()),
        };

        match (title, time_minutes, price) {
            (Some(title), Some(time_minutes), Some(price)) if errors.is_empty() => Ok(RecipeDraft {
                title,
                time_minutes,
                price,
                link,
                ingredients,
                tags,
            }),
            _ => Err(errors),
        }
    }
}

fn validate_price(price: Decimal, errors: &mut FieldErrors) -> Option<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        errors.insert(
            "price".into(),
            "Ensure this value is greater than or equal to 0.".into(),
        );
        return None;
    }
    if price.normalize().scale() > 2 {
        errors.insert(
            "price".into(),
            "Ensure that there are no more than 2 decimal places.".into(),
        );
        return None;
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        errors.insert(
            "price".into(),
            "Ensure that there are no more than 5 digits in total.".into(),
        );
        return None;
    }
    Some(display_price(price))
}

fn dedup(ids: Vec<i64>) -> Vec<i64> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
