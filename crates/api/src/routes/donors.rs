//! Donor browsing, availability refresh, and contact disclosure reads.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{BloodType, ContactRequest, ContactRequestStatus, DonorSummary};
use persistence::repositories::{ContactRequestRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Query parameters for donor browsing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListDonorsQuery {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
}

/// Response after a dashboard availability refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshResponse {
    /// Whether this call performed the flip back to available.
    pub refreshed: bool,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<NaiveDate>,
}

/// Disclosed contact details, only ever returned inside the window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ContactInfoResponse {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// List donors that are active and currently available.
///
/// GET /api/v1/donors
pub async fn list_donors(
    State(state): State<AppState>,
    Query(query): Query<ListDonorsQuery>,
    auth: AuthUser,
) -> Result<Json<Vec<DonorSummary>>, ApiError> {
    auth.require_requester()?;

    let blood_type = query
        .blood_type
        .as_deref()
        .map(BloodType::from_str)
        .transpose()
        .map_err(ApiError::Validation)?;

    let users = UserRepository::new(state.pool.clone());
    let donors = users
        .list_available_donors(query.city.as_deref(), blood_type.map(Into::into))
        .await?
        .into_iter()
        .map(|entity| DonorSummary {
            id: entity.id,
            name: entity.name,
            city: entity.city,
            blood_type: entity.blood_type.map(Into::into),
            is_available: entity.is_available,
            next_eligible_date: entity.next_eligible_date,
        })
        .collect();

    Ok(Json(donors))
}

/// Re-evaluate the caller's cooldown on dashboard load and flip them back
/// to available once it has elapsed. Safe to call repeatedly.
///
/// POST /api/v1/donors/me/refresh
pub async fn refresh_availability(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RefreshResponse>, ApiError> {
    auth.require_donor()?;

    let users = UserRepository::new(state.pool.clone());
    let refreshed = users.refresh_availability(auth.user_id).await?;
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if refreshed {
        tracing::info!(donor_id = %auth.user_id, "Donor availability restored after cooldown");
    }

    Ok(Json(RefreshResponse {
        refreshed,
        is_available: user.is_available,
        next_eligible_date: user.next_eligible_date,
    }))
}

/// Read a donor's contact details inside the disclosure window.
///
/// The window is re-evaluated on every read against the persisted approval
/// instant; nothing about disclosure is cached.
///
/// GET /api/v1/donors/{donor_id}/contact-info
pub async fn contact_info(
    State(state): State<AppState>,
    Path(donor_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<Json<ContactInfoResponse>, ApiError> {
    auth.require_requester()?;

    let contacts = ContactRequestRepository::new(state.pool.clone());
    let record: ContactRequest = contacts
        .find_pair(auth.user_id, donor_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotDisclosable("No approved contact request for this donor".to_string())
        })?
        .into();

    let now = Utc::now();
    match record.status {
        ContactRequestStatus::Pending => {
            return Err(ApiError::NotDisclosable(
                "Contact request is still pending".to_string(),
            ))
        }
        ContactRequestStatus::Rejected => {
            return Err(ApiError::NotDisclosable(
                "Contact request was rejected".to_string(),
            ))
        }
        ContactRequestStatus::Approved if !record.is_disclosable_at(now) => {
            return Err(ApiError::NotDisclosable(
                "Disclosure window has elapsed".to_string(),
            ))
        }
        ContactRequestStatus::Approved => {}
    }

    let users = UserRepository::new(state.pool.clone());
    let donor = users
        .find_by_id(donor_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donor not found".to_string()))?;

    let expires_at = record
        .disclosure_expires_at()
        .ok_or_else(|| ApiError::Internal("Approved record without approval time".to_string()))?;

    Ok(Json(ContactInfoResponse {
        name: donor.name,
        phone: donor.phone,
        email: donor.email,
        expires_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_response_omits_date_when_cleared() {
        let response = RefreshResponse {
            refreshed: true,
            is_available: true,
            next_eligible_date: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"refreshed\":true"));
        assert!(!json.contains("next_eligible_date"));
    }

    #[test]
    fn donors_query_deserializes_with_defaults() {
        let query: ListDonorsQuery = serde_json::from_str("{}").unwrap();
        assert!(query.city.is_none());
        assert!(query.blood_type.is_none());
    }

    #[test]
    fn contact_info_response_shape() {
        let response = ContactInfoResponse {
            name: "Donor".to_string(),
            phone: "22334455".to_string(),
            email: "donor@example.com".to_string(),
            expires_at: Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("expires_at"));
    }
}
