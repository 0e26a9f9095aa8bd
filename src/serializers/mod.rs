//! Wire representation of entities and validation of incoming payloads.
//!
//! Output structs are what handlers serialize; `*Payload` structs are what
//! handlers deserialize, and their `validate`/`into_draft` methods are the
//! inverse mapping that either yields a clean value or per-field errors.

pub mod attribute;
pub mod recipe;
pub mod user;

use std::collections::HashMap;

pub use attribute::{AttributeOut, AttributePayload};
pub use recipe::{RecipeDetailOut, RecipeOut, RecipePayload};
pub use user::UserOut;

/// Field name -> human readable problem
pub type FieldErrors = HashMap<String, String>;

pub const MAX_NAME_LENGTH: usize = 255;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";

pub(crate) fn too_long(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

/// Trim and check a required, non-blank, length-limited string
pub(crate) fn clean_text(
    field: &str,
    value: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<String> {
    let Some(raw) = value else {
        errors.insert(field.to_string(), REQUIRED.to_string());
        return None;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.insert(field.to_string(), BLANK.to_string());
        return None;
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        errors.insert(field.to_string(), too_long(MAX_NAME_LENGTH));
        return None;
    }
    Some(trimmed.to_string())
}
