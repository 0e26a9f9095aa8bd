use serde::Serialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::database::models::User;

#[derive(Debug, Clone, Serialize)]
pub struct UserOut {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserOut {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

impl From<&Principal> for UserOut {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            email: principal.email.clone(),
            name: principal.name.clone(),
        }
    }
}
