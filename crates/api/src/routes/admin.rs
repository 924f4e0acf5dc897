//! Admin routes: dashboard stats, user management, broadcasts, and the
//! contact-us inbox.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::{BloodType, ContactMessage, DonationRequest, Role};
use persistence::repositories::{
    ContactMessageRepository, DonationRequestRepository, UserRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::routes::requests::CreateRequestBody;

/// Dashboard statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatsResponse {
    pub donor_count: i64,
    pub requester_count: i64,
    pub open_request_count: i64,
    pub unread_message_count: i64,
}

/// Query parameters for the user listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListUsersQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// A user in the admin listing. No credential or contact-gated fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminUserItem {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub city: String,
    pub blood_type: Option<BloodType>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Pagination info for list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// Response for the user listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListUsersResponse {
    pub data: Vec<AdminUserItem>,
    pub pagination: Pagination,
}

/// Response after toggling a user's active flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ToggleActiveResponse {
    pub id: Uuid,
    pub is_active: bool,
}

/// Dashboard statistics.
///
/// GET /api/v1/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StatsResponse>, ApiError> {
    auth.require_admin()?;

    let users = UserRepository::new(state.pool.clone());
    let requests = DonationRequestRepository::new(state.pool.clone());
    let messages = ContactMessageRepository::new(state.pool.clone());

    let counts = users.role_counts().await?;
    let open_request_count = requests.count_open().await?;
    let unread_message_count = messages.unread_count().await?;

    Ok(Json(StatsResponse {
        donor_count: counts.donors,
        requester_count: counts.requesters,
        open_request_count,
        unread_message_count,
    }))
}

/// List users with optional name/email search.
///
/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
    auth: AuthUser,
) -> Result<Json<ListUsersResponse>, ApiError> {
    auth.require_admin()?;

    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, 100);
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

    let users = UserRepository::new(state.pool.clone());
    let total = users.count(search).await?;
    let entities = users
        .list(search, per_page, (page - 1) * per_page)
        .await?;

    let data = entities
        .into_iter()
        .map(|entity| AdminUserItem {
            id: entity.id,
            role: entity.role.into(),
            name: entity.name,
            email: entity.email,
            city: entity.city,
            blood_type: entity.blood_type.map(Into::into),
            is_available: entity.is_available,
            next_eligible_date: entity.next_eligible_date,
            is_active: entity.is_active,
            created_at: entity.created_at,
        })
        .collect();

    Ok(Json(ListUsersResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
        },
    }))
}

/// Toggle a user's active flag (soft disable).
///
/// POST /api/v1/admin/users/{user_id}/toggle-active
pub async fn toggle_user_active(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<Json<ToggleActiveResponse>, ApiError> {
    auth.require_admin()?;

    let users = UserRepository::new(state.pool.clone());
    let is_active = users
        .toggle_active(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(
        user_id = %user_id,
        admin_id = %auth.user_id,
        is_active = is_active,
        "Toggled user active flag"
    );

    Ok(Json(ToggleActiveResponse { id: user_id, is_active }))
}

/// Create a broadcast donation request on behalf of the platform.
///
/// POST /api/v1/admin/broadcasts
pub async fn create_broadcast(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<DonationRequest>), ApiError> {
    auth.require_admin()?;
    body.validate()?;
    let blood_type = body.blood_type()?;

    let requests = DonationRequestRepository::new(state.pool.clone());
    let entity = requests
        .create(
            auth.user_id,
            blood_type.into(),
            &body.city,
            &body.hospital_location,
            body.donation_date,
            body.donation_time_start,
            body.donation_time_end,
            body.message.as_deref(),
            true,
        )
        .await?;

    tracing::info!(
        request_id = %entity.id,
        admin_id = %auth.user_id,
        "Created broadcast request"
    );

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// All contact-us messages, newest first.
///
/// GET /api/v1/admin/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    auth.require_admin()?;

    let messages = ContactMessageRepository::new(state.pool.clone());
    let entities = messages.list_all().await?;

    Ok(Json(entities.into_iter().map(Into::into).collect()))
}

/// Mark a contact-us message as read.
///
/// POST /api/v1/admin/messages/{message_id}/read
pub async fn mark_message_read(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;

    let messages = ContactMessageRepository::new(state.pool.clone());
    if messages.mark_read(message_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Message not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let query: ListUsersQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 20);
        assert!(query.search.is_none());
    }

    #[test]
    fn stats_response_serializes() {
        let response = StatsResponse {
            donor_count: 12,
            requester_count: 7,
            open_request_count: 3,
            unread_message_count: 1,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"donor_count\":12"));
        assert!(json.contains("\"unread_message_count\":1"));
    }

    #[test]
    fn admin_user_item_has_no_password_field() {
        let item = AdminUserItem {
            id: Uuid::new_v4(),
            role: Role::Donor,
            name: "Donor".to_string(),
            email: "donor@example.com".to_string(),
            city: "Atar".to_string(),
            blood_type: Some(BloodType::BNegative),
            is_available: true,
            next_eligible_date: None,
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"blood_type\":\"B-\""));
    }
}
