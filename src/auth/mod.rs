use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::database::models::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Longest lifetime a token may be issued with (ten years)
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 10;

impl Claims {
    pub fn new(user_id: Uuid, email: String) -> Self {
        Self::with_expiry(user_id, email, config::config().security.jwt_expiry_hours)
    }

    /// `expiry_hours` is clamped to `MAX_EXPIRY_HOURS`
    pub fn with_expiry(user_id: Uuid, email: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let hours = expiry_hours.min(MAX_EXPIRY_HOURS) as i64;
        let exp = (now + Duration::hours(hours)).timestamp();

        Self {
            sub: user_id,
            email,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.email.clone())
    }
}

/// The authenticated user a request acts for. Every scoped query takes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    encode_with_secret(claims, &config::config().security.jwt_secret)
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    decode_with_secret(token, &config::config().security.jwt_secret)
}

fn encode_with_secret(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

fn decode_with_secret(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            exp: now + exp_offset_secs,
            iat: now,
        }
    }

    #[test]
    fn round_trips_claims() {
        let original = claims(3600);
        let token = encode_with_secret(&original, "secret").unwrap();
        assert_eq!(decode_with_secret(&token, "secret").unwrap(), original);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = encode_with_secret(&claims(3600), "secret").unwrap();
        assert!(matches!(
            decode_with_secret(&token, "other"),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let token = encode_with_secret(&claims(-3600), "secret").unwrap();
        assert!(decode_with_secret(&token, "secret").is_err());
    }

    #[test]
    fn huge_expiry_is_clamped() {
        let claims = Claims::with_expiry(Uuid::new_v4(), "a@example.com".into(), u64::MAX);
        let max_secs = MAX_EXPIRY_HOURS as i64 * 3600;
        assert_eq!(claims.exp - claims.iat, max_secs);

        let token = encode_with_secret(&claims, "secret").unwrap();
        assert_eq!(decode_with_secret(&token, "secret").unwrap(), claims);
    }

    #[test]
    fn expiry_follows_requested_hours() {
        let claims = Claims::with_expiry(Uuid::new_v4(), "a@example.com".into(), 2);
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            encode_with_secret(&claims(60), ""),
            Err(JwtError::InvalidSecret)
        ));
    }

    #[test]
    fn config_backed_helpers_agree() {
        let original = claims(600);
        let token = generate_jwt(&original).unwrap();
        assert_eq!(validate_jwt(&token).unwrap().sub, original.sub);
    }
}
