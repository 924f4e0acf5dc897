//! Public contact-us form route.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use persistence::repositories::ContactMessageRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Request body for the public contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitMessageBody {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub body: String,
}

/// Response after submitting a message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmitMessageResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Submit a contact-us message. Public, no authentication.
///
/// POST /api/v1/messages
pub async fn submit_message(
    State(state): State<AppState>,
    Json(body): Json<SubmitMessageBody>,
) -> Result<(StatusCode, Json<SubmitMessageResponse>), ApiError> {
    body.validate()?;

    let messages = ContactMessageRepository::new(state.pool.clone());
    let entity = messages.create(&body.name, &body.email, &body.body).await?;

    tracing::info!(message_id = %entity.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(SubmitMessageResponse {
            id: entity.id,
            created_at: entity.created_at,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_message_passes() {
        let body = SubmitMessageBody {
            name: "A Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            body: "How do I register?".to_string(),
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn empty_body_rejected() {
        let body = SubmitMessageBody {
            name: "A Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            body: String::new(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn bad_email_rejected() {
        let body = SubmitMessageBody {
            name: "A Visitor".to_string(),
            email: "nope".to_string(),
            body: "Hello".to_string(),
        };
        assert!(body.validate().is_err());
    }
}
