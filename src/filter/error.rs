use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid boolean for '{param}': {value}")]
    InvalidFlag { param: String, value: String },

    #[error("Invalid id list for '{param}': {value}")]
    InvalidIdList { param: String, value: String },
}

impl FilterError {
    pub fn param(&self) -> &str {
        match self {
            FilterError::InvalidFlag { param, .. } => param,
            FilterError::InvalidIdList { param, .. } => param,
        }
    }
}
