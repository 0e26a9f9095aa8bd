use serde::{Deserialize, Serialize};

use super::{clean_text, FieldErrors};
use crate::database::models::Attribute;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOut {
    pub id: i64,
    pub name: String,
}

impl From<&Attribute> for AttributeOut {
    fn from(attribute: &Attribute) -> Self {
        Self {
            id: attribute.id,
            name: attribute.name.clone(),
        }
    }
}

impl From<Attribute> for AttributeOut {
    fn from(attribute: Attribute) -> Self {
        Self {
            id: attribute.id,
            name: attribute.name,
        }
    }
}

/// Body of ingredient/tag create and update requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributePayload {
    #[serde(default)]
    pub name: Option<String>,
}

impl AttributePayload {
    /// The cleaned name; `name` is required.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        match clean_text("name", self.name.as_deref(), &mut errors) {
            Some(name) => Ok(name),
            None => Err(errors),
        }
    }

    /// Partial update: an absent name means "leave unchanged".
    pub fn validate_partial(&self) -> Result<Option<String>, FieldErrors> {
        match self.name {
            Some(_) => self.validate().map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializers::{BLANK, REQUIRED};

    fn payload(name: Option<&str>) -> AttributePayload {
        AttributePayload {
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn trims_name() {
        assert_eq!(payload(Some("  Cabbage ")).validate().unwrap(), "Cabbage");
    }

    #[test]
    fn rejects_blank_name() {
        let errors = payload(Some("")).validate().unwrap_err();
        assert_eq!(errors["name"], BLANK);

        let errors = payload(Some("   ")).validate().unwrap_err();
        assert_eq!(errors["name"], BLANK);
    }

    #[test]
    fn requires_name() {
        let errors = payload(None).validate().unwrap_err();
        assert_eq!(errors["name"], REQUIRED);
    }

    #[test]
    fn rejects_long_name() {
        let long = "x".repeat(256);
        let errors = payload(Some(&long)).validate().unwrap_err();
        assert!(errors["name"].contains("255"));
        assert!(payload(Some(&"x".repeat(255))).validate().is_ok());
    }

    #[test]
    fn partial_allows_missing_name() {
        assert_eq!(payload(None).validate_partial().unwrap(), None);
        assert!(payload(Some("")).validate_partial().is_err());
    }

    #[test]
    fn output_has_id_and_name_only() {
        let attribute = Attribute {
            id: 4,
            user_id: uuid::Uuid::new_v4(),
            name: "Salt".into(),
        };
        let value = serde_json::to_value(AttributeOut::from(&attribute)).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 4, "name": "Salt" }));
    }
}
