//! Session token issuance and validation
//!
//! Tokens are HS256-signed and carry a typed claims structure (identity
//! plus role). The claims are validated once at the access-control
//! boundary and passed explicitly from there on.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Role, User};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Session lifetime in seconds (default: 24 hours)
    pub session_ttl: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: signing secret (demo default if unset)
    /// - `JWT_SESSION_TTL`: session lifetime in seconds (default: 86400)
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "super-secret-fornace".to_string());

        let session_ttl = std::env::var("JWT_SESSION_TTL")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(86_400);

        JwtConfig {
            secret,
            session_ttl,
        }
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email (the identity key orders and invoices are scoped to)
    pub email: String,
    /// Account role
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_ttl: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            session_ttl: config.session_ttl,
        }
    }

    /// Issue a session token for a user
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now().timestamp() as u64;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.session_ttl,
        };

        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "test-secret".to_string(),
            session_ttl: 3600,
        })
    }

    fn test_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            password_hash: String::new(),
            role,
            verified: true,
            failed_logins: 0,
            locked_until: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let service = test_service();
        let user = test_user(Role::Admin);

        let token = service.issue(&user).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let service = test_service();
        let other = JwtService::new(&JwtConfig {
            secret: "different-secret".to_string(),
            session_ttl: 3600,
        });

        let token = other.issue(&test_user(Role::Customer)).unwrap();
        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = test_service();
        let now = Utc::now().timestamp() as u64;
        // Expired well past the default validation leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            role: Role::Customer,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(test_service().validate("not-a-token").is_err());
    }
}
