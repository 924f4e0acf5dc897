//! Authentication service: registration and login.

use sqlx::PgPool;
use thiserror::Error;

use domain::models::{BloodType, Role, UserSummary};
use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::{validate_city, validate_national_id, validate_phone};

use crate::config::AuthConfig;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Only donor and requester accounts can be registered")]
    InvalidRole,

    #[error("Donors must declare a blood type")]
    MissingBloodType,

    #[error("{0}")]
    InvalidField(String),

    #[error("National identifier already registered")]
    DuplicateNationalId,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    UserDisabled,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Registration input, already deserialized and coarsely validated by the
/// route layer.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub role: Role,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub city: String,
    pub blood_type: Option<BloodType>,
    pub national_id: Option<String>,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: UserSummary,
    pub access_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    jwt: JwtConfig,
    token_expiry_secs: i64,
}

impl AuthService {
    /// Creates a new AuthService over the given pool and auth configuration.
    pub fn new(pool: PgPool, auth_config: &AuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt: JwtConfig::new(
                &auth_config.jwt_secret,
                auth_config.token_expiry_secs,
                auth_config.leeway_secs,
            ),
            token_expiry_secs: auth_config.token_expiry_secs,
        }
    }

    /// Registers a donor or requester account and signs them in.
    ///
    /// Uniqueness of email and national id is backed by database constraints;
    /// the pre-check on national id only exists to give a precise error
    /// before paying for the password hash.
    pub async fn register(&self, input: RegisterUser) -> Result<AuthResult, AuthError> {
        if !matches!(input.role, Role::Donor | Role::Requester) {
            return Err(AuthError::InvalidRole);
        }

        validate_phone(&input.phone).map_err(field_error)?;
        validate_city(&input.city).map_err(field_error)?;
        if let Some(national_id) = input.national_id.as_deref() {
            validate_national_id(national_id).map_err(field_error)?;
        }

        if input.role == Role::Donor && input.blood_type.is_none() {
            return Err(AuthError::MissingBloodType);
        }

        if let Some(national_id) = input.national_id.as_deref() {
            if self.users.national_id_exists(national_id).await? {
                return Err(AuthError::DuplicateNationalId);
            }
        }

        let password_hash = hash_password(&input.password)?;

        let entity = self
            .users
            .create(
                input.role.into(),
                &input.name,
                &input.phone,
                &input.email,
                &password_hash,
                &input.city,
                input.blood_type.map(Into::into),
                input.national_id.as_deref(),
            )
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    match db_err.constraint() {
                        Some(name) if name.contains("national_id") => {
                            AuthError::DuplicateNationalId
                        }
                        _ => AuthError::EmailAlreadyExists,
                    }
                }
                _ => AuthError::DatabaseError(e),
            })?;

        tracing::info!(user_id = %entity.id, role = %input.role, "Registered user");
        self.auth_result(entity)
    }

    /// Verifies credentials and issues an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let entity = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &entity.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !entity.is_active {
            return Err(AuthError::UserDisabled);
        }

        tracing::info!(user_id = %entity.id, "User logged in");
        self.auth_result(entity)
    }

    fn auth_result(&self, entity: UserEntity) -> Result<AuthResult, AuthError> {
        let role: Role = entity.role.into();
        let (access_token, _claims) = self.jwt.issue(entity.id, &role.to_string())?;

        Ok(AuthResult {
            user: UserSummary {
                id: entity.id,
                role,
                name: entity.name,
                email: entity.email,
                city: entity.city,
            },
            access_token,
            expires_in: self.token_expiry_secs,
        })
    }
}

fn field_error(err: validator::ValidationError) -> AuthError {
    AuthError::InvalidField(
        err.message
            .map(|m| m.to_string())
            .unwrap_or_else(|| "Invalid field".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            AuthError::MissingBloodType.to_string(),
            "Donors must declare a blood type"
        );
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(
            AuthError::DuplicateNationalId.to_string(),
            "National identifier already registered"
        );
    }

    #[test]
    fn field_error_carries_message() {
        let err = shared::validation::validate_phone("123456789").unwrap_err();
        let auth_err = field_error(err);
        assert_eq!(auth_err.to_string(), "Phone must be 1-8 digits");
    }
}
