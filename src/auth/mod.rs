pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::database::models::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn for_user(user: &User) -> Result<Self, JwtError> {
        Self::with_expiry(user, config::config().security.jwt_expiry_hours)
    }

    fn with_expiry(user: &User, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| JwtError::TokenGeneration(format!("expiry of {expiry_hours}h is out of range")))?;

        Ok(Self {
            sub: user.id,
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    generate_jwt_with_secret(claims, &config::config().security.jwt_secret)
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    validate_jwt_with_secret(token, &config::config().security.jwt_secret)
}

fn generate_jwt_with_secret(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

fn validate_jwt_with_secret(token: &str, secret: &str) -> Result<Claims, JwtError> {
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

    fn claims(exp_offset_hours: i64) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            exp: (now + Duration::hours(exp_offset_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn token_round_trips_subject() {
        let original = claims(1);
        let token = generate_jwt_with_secret(&original, "secret").unwrap();
        let decoded = validate_jwt_with_secret(&token, "secret").unwrap();
        assert_eq!(decoded.sub, original.sub);
        assert_eq!(decoded.email, "test@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_jwt_with_secret(&claims(1), "secret").unwrap();
        assert!(matches!(
            validate_jwt_with_secret(&token, "other"),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = generate_jwt_with_secret(&claims(-2), "secret").unwrap();
        assert!(validate_jwt_with_secret(&token, "secret").is_err());
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: String::new(),
            name: String::new(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn expiry_is_counted_from_now() {
        let claims = Claims::with_expiry(&user(), 2).unwrap();
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn oversized_expiry_is_an_error_not_a_panic() {
        assert!(matches!(
            Claims::with_expiry(&user(), u64::MAX),
            Err(JwtError::TokenGeneration(_))
        ));
        assert!(matches!(
            Claims::with_expiry(&user(), i64::MAX as u64),
            Err(JwtError::TokenGeneration(_))
        ));
    }

    #[test]
    fn empty_secret_is_an_error() {
        assert!(matches!(
            generate_jwt_with_secret(&claims(1), ""),
            Err(JwtError::InvalidSecret)
        ));
    }
}
