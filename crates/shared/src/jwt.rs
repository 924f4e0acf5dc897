//! JWT access token utilities.
//!
//! Tokens are short-lived HS256 access tokens. The subject claim carries the
//! user id and a `role` claim carries the account role so handlers can make
//! authorization decisions without a database round trip. There is no ambient
//! session: the verified claims are threaded into handlers as an argument.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for token operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Account role, as stored (`donor`, `requester`, `both`, `admin`)
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token identifier
    pub jti: String,
}

/// Signing/verification configuration for access tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_secs: i64,
    leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: &str, token_expiry_secs: i64, leeway_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_secs,
            leeway_secs,
        }
    }

    /// Issues a signed access token for the given user.
    pub fn issue(&self, user_id: Uuid, role: &str) -> Result<(String, Claims), JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(self.token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;
        Ok((token, claims))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken,
            })
    }

    /// Configured access token lifetime in seconds.
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret-at-least-32-bytes-long!!", 3600, 30)
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let cfg = config();
        let user_id = Uuid::new_v4();
        let (token, issued) = cfg.issue(user_id, "donor").unwrap();

        let claims = cfg.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "donor");
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let cfg = config();
        let (token, _) = cfg.issue(Uuid::new_v4(), "requester").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(cfg.verify(&tampered), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let cfg = config();
        let other = JwtConfig::new("a-completely-different-signing-key!!", 3600, 30);
        let (token, _) = cfg.issue(Uuid::new_v4(), "admin").unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative expiry backdates the token past the leeway.
        let cfg = JwtConfig::new("test-secret-at-least-32-bytes-long!!", -120, 0);
        let (token, _) = cfg.issue(Uuid::new_v4(), "donor").unwrap();
        assert!(matches!(cfg.verify(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn tokens_carry_unique_jti() {
        let cfg = config();
        let user_id = Uuid::new_v4();
        let (_, a) = cfg.issue(user_id, "donor").unwrap();
        let (_, b) = cfg.issue(user_id, "donor").unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
