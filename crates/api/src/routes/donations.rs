//! Donation routes: history and the explicit completion transition.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use metrics::counter;
use serde::Serialize;
use uuid::Uuid;

use domain::models::Donation;
use persistence::repositories::{CompleteError, DonationRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Response after completing a donation: the record plus the cooldown the
/// completion started.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CompleteResponse {
    pub donation: Donation,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<NaiveDate>,
}

/// The calling donor's donation history.
///
/// GET /api/v1/donations/mine
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Donation>>, ApiError> {
    auth.require_donor()?;

    let donations = DonationRepository::new(state.pool.clone());
    let entities = donations.list_by_donor(auth.user_id).await?;

    Ok(Json(entities.into_iter().map(Into::into).collect()))
}

/// Mark a committed donation as completed.
///
/// Acceptance leaves the donor unavailable with no eligibility date; this
/// transition stamps the completion and starts the standard cooldown, giving
/// the donor a defined path back to availability.
///
/// POST /api/v1/donations/{donation_id}/complete
pub async fn complete_donation(
    State(state): State<AppState>,
    Path(donation_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<Json<CompleteResponse>, ApiError> {
    auth.require_donor()?;

    let donations = DonationRepository::new(state.pool.clone());
    let entity = donations
        .complete(donation_id, auth.user_id)
        .await
        .map_err(|e| match e {
            CompleteError::NotFound => ApiError::NotFound("Donation not found".to_string()),
            CompleteError::InvalidTransition => {
                ApiError::Conflict("Donation already completed".to_string())
            }
            CompleteError::Database(db_err) => ApiError::from(db_err),
        })?;

    counter!("donations_completed_total").increment(1);
    tracing::info!(
        donation_id = %donation_id,
        donor_id = %auth.user_id,
        "Donation completed, cooldown started"
    );

    let users = UserRepository::new(state.pool.clone());
    let donor = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(CompleteResponse {
        donation: entity.into(),
        is_available: donor.is_available,
        next_eligible_date: donor.next_eligible_date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::DonationStatus;

    #[test]
    fn complete_response_serializes_cooldown() {
        let response = CompleteResponse {
            donation: Donation {
                id: Uuid::new_v4(),
                request_id: Uuid::new_v4(),
                donor_id: Uuid::new_v4(),
                status: DonationStatus::Completed,
                completed_at: Some(Utc::now()),
                created_at: Utc::now(),
            },
            is_available: false,
            next_eligible_date: NaiveDate::from_ymd_opt(2025, 9, 1),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"is_available\":false"));
        assert!(json.contains("next_eligible_date"));
        assert!(json.contains("\"status\":\"completed\""));
    }
}
