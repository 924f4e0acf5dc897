//! Authenticated identity extractor.
//!
//! Validates the Bearer token and hands the verified identity to handlers as
//! an argument. There is no ambient "current user": every core call receives
//! the identity explicitly.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::str::FromStr;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::Role;
use shared::jwt::JwtConfig;

/// The verified identity behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Rejects callers whose role has no donor capability.
    pub fn require_donor(&self) -> Result<(), ApiError> {
        if self.role.is_donor() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Donor role required".to_string()))
        }
    }

    /// Rejects callers whose role has no requester capability.
    pub fn require_requester(&self) -> Result<(), ApiError> {
        if self.role.is_requester() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Requester role required".to_string()))
        }
    }

    /// Rejects everyone but administrators.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin role required".to_string()))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let jwt = JwtConfig::new(
            &state.config.auth.jwt_secret,
            state.config.auth.token_expiry_secs,
            state.config.auth.leeway_secs,
        );

        let claims = jwt
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;
        let role = Role::from_str(&claims.role)
            .map_err(|_| ApiError::Unauthorized("Invalid token role".to_string()))?;

        Ok(AuthUser { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donor_role_checks() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Donor,
        };
        assert!(user.require_donor().is_ok());
        assert!(user.require_requester().is_err());
        assert!(user.require_admin().is_err());
    }

    #[test]
    fn requester_role_checks() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Requester,
        };
        assert!(user.require_requester().is_ok());
        assert!(user.require_donor().is_err());
    }

    #[test]
    fn both_role_has_both_capabilities() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Both,
        };
        assert!(user.require_donor().is_ok());
        assert!(user.require_requester().is_ok());
        assert!(user.require_admin().is_err());
    }

    #[test]
    fn admin_passes_every_check() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(user.require_donor().is_ok());
        assert!(user.require_requester().is_ok());
        assert!(user.require_admin().is_ok());
    }
}
