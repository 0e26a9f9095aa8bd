pub mod attribute;
pub mod recipe;
pub mod user;

pub use attribute::{Attribute, AttributeKind};
pub use recipe::{Recipe, RecipeDraft, RecipeWithLinks};
pub use user::User;
