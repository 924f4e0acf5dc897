//! Donation request routes: creation, listing, and acceptance.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use metrics::counter;
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use domain::models::{BloodType, Donation, DonationRequest};
use persistence::repositories::{
    AcceptError, DonationRepository, DonationRequestRepository, UserRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Request body for creating a donation request (and admin broadcasts).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRequestBody {
    /// Blood type label, e.g. "O-".
    pub blood_type: String,

    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: String,

    #[validate(length(min = 1, max = 200, message = "Hospital must be 1-200 characters"))]
    pub hospital_location: String,

    pub donation_date: NaiveDate,
    pub donation_time_start: NaiveTime,
    pub donation_time_end: NaiveTime,

    #[validate(length(max = 1000, message = "Message must be at most 1000 characters"))]
    pub message: Option<String>,
}

impl CreateRequestBody {
    pub fn blood_type(&self) -> Result<BloodType, ApiError> {
        BloodType::from_str(&self.blood_type).map_err(ApiError::Validation)
    }
}

/// Create a donation request.
///
/// POST /api/v1/requests
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<DonationRequest>), ApiError> {
    auth.require_requester()?;
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
            false,
        )
        .await?;

    tracing::info!(
        request_id = %entity.id,
        requester_id = %auth.user_id,
        blood_type = %blood_type,
        "Created donation request"
    );

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// Open requests matching the calling donor's city and blood type.
///
/// Unavailable donors see an empty list; they cannot accept anyway.
///
/// GET /api/v1/requests/open
pub async fn list_open(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<DonationRequest>>, ApiError> {
    auth.require_donor()?;

    let users = UserRepository::new(state.pool.clone());
    let donor = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let entities = match (donor.is_available, donor.blood_type) {
        (true, Some(blood_type)) => {
            DonationRequestRepository::new(state.pool.clone())
                .list_open(&donor.city, blood_type)
                .await?
        }
        _ => Vec::new(),
    };

    Ok(Json(entities.into_iter().map(Into::into).collect()))
}

/// The calling requester's own requests, newest first.
///
/// GET /api/v1/requests/mine
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<DonationRequest>>, ApiError> {
    auth.require_requester()?;

    let requests = DonationRequestRepository::new(state.pool.clone());
    let entities = requests.list_by_requester(auth.user_id).await?;

    Ok(Json(entities.into_iter().map(Into::into).collect()))
}

/// Accept an open donation request.
///
/// One transaction binds the donor, fulfills the request, and flips the
/// donor unavailable; concurrent acceptors get exactly one winner.
///
/// POST /api/v1/requests/{request_id}/accept
pub async fn accept_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<Donation>), ApiError> {
    auth.require_donor()?;

    let donations = DonationRepository::new(state.pool.clone());
    let entity = donations
        .accept(request_id, auth.user_id)
        .await
        .map_err(|e| match e {
            AcceptError::RequestNotFound => {
                ApiError::NotFound("Donation request not found".to_string())
            }
            AcceptError::AlreadyFulfilled => {
                ApiError::Conflict("Donation request already fulfilled".to_string())
            }
            AcceptError::DonorUnavailable => {
                ApiError::Conflict("Donor is not currently available".to_string())
            }
            AcceptError::Database(db_err) => ApiError::from(db_err),
        })?;

    counter!("donation_requests_accepted_total").increment(1);
    tracing::info!(
        request_id = %request_id,
        donor_id = %auth.user_id,
        donation_id = %entity.id,
        "Donation request accepted"
    );

    Ok((StatusCode::CREATED, Json(entity.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_body() -> CreateRequestBody {
        CreateRequestBody {
            blood_type: "A+".to_string(),
            city: "Nouakchott".to_string(),
            hospital_location: "Central Hospital".to_string(),
            donation_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            donation_time_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            donation_time_end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            message: Some("Urgent".to_string()),
        }
    }

    #[test]
    fn valid_body_passes() {
        let body = base_body();
        assert!(body.validate().is_ok());
        assert_eq!(body.blood_type().unwrap(), BloodType::APositive);
    }

    #[test]
    fn unknown_blood_type_rejected() {
        let mut body = base_body();
        body.blood_type = "Z+".to_string();
        assert!(body.blood_type().is_err());
    }

    #[test]
    fn empty_city_rejected() {
        let mut body = base_body();
        body.city = String::new();
        assert!(body.validate().is_err());
    }

    #[test]
    fn body_deserializes_times() {
        let json = r#"{
            "blood_type": "O-",
            "city": "Atar",
            "hospital_location": "Regional",
            "donation_date": "2025-06-01",
            "donation_time_start": "09:00:00",
            "donation_time_end": "12:00:00"
        }"#;
        let body: CreateRequestBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.donation_time_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert!(body.message.is_none());
    }
}
