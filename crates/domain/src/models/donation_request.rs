//! Donation request domain models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::BloodType;

/// Status of a donation request. Transitions only move forward:
/// open requests become fulfilled or cancelled and stay there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Fulfilled,
    Cancelled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Open => write!(f, "open"),
            RequestStatus::Fulfilled => write!(f, "fulfilled"),
            RequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A call for blood, created by a requester or broadcast by an admin.
///
/// Donors only see requests that are open and match their own city and
/// blood type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DonationRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub blood_type_required: BloodType,
    pub city: String,
    pub hospital_location: String,
    pub donation_date: NaiveDate,
    pub donation_time_start: NaiveTime,
    pub donation_time_end: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: RequestStatus,
    pub is_broadcast: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(RequestStatus::Open.to_string(), "open");
        assert_eq!(RequestStatus::Fulfilled.to_string(), "fulfilled");
        assert_eq!(RequestStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn request_serializes_blood_type_label() {
        let request = DonationRequest {
            id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            blood_type_required: BloodType::OPositive,
            city: "Atar".to_string(),
            hospital_location: "Regional Hospital".to_string(),
            donation_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            donation_time_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            donation_time_end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            message: None,
            status: RequestStatus::Open,
            is_broadcast: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"blood_type_required\":\"O+\""));
        assert!(json.contains("\"status\":\"open\""));
        assert!(!json.contains("\"message\""));
    }
}
