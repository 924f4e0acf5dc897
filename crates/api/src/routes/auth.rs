//! Authentication routes: registration and login.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use domain::models::{BloodType, Role, UserSummary};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthError, AuthService, RegisterUser};

/// Request body for registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterRequest {
    /// `donor` or `requester`; admins are seeded, never self-registered.
    pub role: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 8, message = "Phone must be 1-8 characters"))]
    pub phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: String,

    /// Blood type label, e.g. "A+". Required for donors.
    pub blood_type: Option<String>,

    #[validate(length(max = 10, message = "National id must be at most 10 characters"))]
    pub national_id: Option<String>,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response body for successful registration or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthResponse {
    pub user: UserSummary,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Register a donor or requester account.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let role = Role::from_str(&request.role)
        .map_err(|_| ApiError::Validation("Role must be donor or requester".to_string()))?;
    let blood_type = request
        .blood_type
        .as_deref()
        .map(BloodType::from_str)
        .transpose()
        .map_err(ApiError::Validation)?;

    let service = AuthService::new(state.pool.clone(), &state.config.auth);
    let result = service
        .register(RegisterUser {
            role,
            name: request.name,
            phone: request.phone,
            email: request.email,
            password: request.password,
            city: request.city,
            blood_type,
            national_id: request.national_id,
        })
        .await
        .map_err(map_auth_error)?;

    Ok((StatusCode::CREATED, Json(auth_response(result))))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), &state.config.auth);
    let result = service
        .login(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(auth_response(result)))
}

fn auth_response(result: crate::services::auth::AuthResult) -> AuthResponse {
    AuthResponse {
        user: result.user,
        access_token: result.access_token,
        token_type: "Bearer".to_string(),
        expires_in: result.expires_in,
    }
}

fn map_auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::InvalidRole
        | AuthError::MissingBloodType
        | AuthError::InvalidField(_)
        | AuthError::DuplicateNationalId => ApiError::Validation(err.to_string()),
        AuthError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
        AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
        AuthError::UserDisabled => ApiError::Forbidden(err.to_string()),
        AuthError::DatabaseError(db_err) => ApiError::from(db_err),
        AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
        AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> RegisterRequest {
        RegisterRequest {
            role: "donor".to_string(),
            name: "Test Donor".to_string(),
            phone: "22334455".to_string(),
            email: "donor@example.com".to_string(),
            password: "secret-password".to_string(),
            city: "Nouakchott".to_string(),
            blood_type: Some("A+".to_string()),
            national_id: Some("1234567890".to_string()),
        }
    }

    #[test]
    fn valid_registration_passes_validation() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn oversized_phone_fails_validation() {
        let mut request = base_request();
        request.phone = "123456789".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn oversized_national_id_fails_validation() {
        let mut request = base_request();
        request.national_id = Some("12345678901".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn bad_email_fails_validation() {
        let mut request = base_request();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn short_password_fails_validation() {
        let mut request = base_request();
        request.password = "short".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn auth_errors_map_to_api_errors() {
        assert!(matches!(
            map_auth_error(AuthError::MissingBloodType),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            map_auth_error(AuthError::EmailAlreadyExists),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            map_auth_error(AuthError::InvalidCredentials),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            map_auth_error(AuthError::UserDisabled),
            ApiError::Forbidden(_)
        ));
    }
}
