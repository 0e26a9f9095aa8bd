use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{generate_jwt, validate_jwt, Claims, JwtError, Principal};
use crate::database::models::user::normalize_email;
use crate::database::models::User;
use crate::database::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Missing or invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("User {0} not found")]
    NotFound(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Users and the bearer tokens that identify them
pub struct UserService<'a> {
    store: &'a dyn Store,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create_user(&self, email: &str, name: &str) -> Result<User, UserError> {
        let email = normalize_email(email);
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(UserError::InvalidEmail(email));
        }

        let user = self.store.create_user(&email, name.trim()).await?;
        info!("Created user {} ({})", user.email, user.id);
        Ok(user)
    }

    /// Existing user for `email`, or a new one
    pub async fn ensure_user(&self, email: &str, name: &str) -> Result<User, UserError> {
        match self.store.find_user_by_email(&normalize_email(email)).await? {
            Some(user) => Ok(user),
            None => self.create_user(email, name).await,
        }
    }

    pub async fn issue_token(&self, email: &str) -> Result<String, UserError> {
        let email = normalize_email(email);
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.clone()))?;
        Ok(generate_jwt(&Claims::for_user(&user))?)
    }

    /// Resolve a bearer token to an active principal
    pub async fn authenticate(&self, token: &str) -> Result<Principal, UserError> {
        let claims = validate_jwt(token)
            .map_err(|e| UserError::InvalidCredentials(e.to_string()))?;
        self.principal_for(claims.sub).await
    }

    async fn principal_for(&self, user_id: Uuid) -> Result<Principal, UserError> {
        match self.store.find_user(user_id).await? {
            Some(user) if user.is_active => Ok(Principal::from(&user)),
            Some(user) => {
                warn!("Rejected token for inactive user {}", user.id);
                Err(UserError::InvalidCredentials("user is inactive".to_string()))
            }
            None => {
                warn!("Rejected token for unknown user {}", user_id);
                Err(UserError::InvalidCredentials("user not found".to_string()))
            }
        }
    }
}
