//! Donation (acceptance) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a donation commitment.
///
/// `Committed` is the state created by acceptance; the donor is unavailable
/// indefinitely until the donation is explicitly completed, which starts the
/// standard cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Committed,
    Completed,
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DonationStatus::Committed => write!(f, "committed"),
            DonationStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Binds one donor to one request. At most one donation exists per request;
/// the first acceptance wins and the record is never deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Donation {
    pub id: Uuid,
    pub request_id: Uuid,
    pub donor_id: Uuid,
    pub status: DonationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(DonationStatus::Committed.to_string(), "committed");
        assert_eq!(DonationStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn committed_donation_has_no_completion_time() {
        let donation = Donation {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            status: DonationStatus::Committed,
            completed_at: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&donation).unwrap();
        assert!(json.contains("\"status\":\"committed\""));
        assert!(!json.contains("completed_at"));
    }
}
