//! Contact request domain models and the disclosure-window rule.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minutes a requester may read the donor's contact details after approval.
///
/// The window is always measured from the persisted approval instant, so the
/// check survives process restarts and never relies on cached state.
pub const DISCLOSURE_WINDOW_MINUTES: i64 = 10;

/// Status of a contact request. `Rejected` is terminal; `Approved` records
/// stay approved but stop disclosing once the window elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ContactRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactRequestStatus::Pending => write!(f, "pending"),
            ContactRequestStatus::Approved => write!(f, "approved"),
            ContactRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A donor's decision on a pending contact request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactDecision {
    Approve,
    Reject,
}

/// A requester's ask to see one donor's contact details. At most one record
/// exists per (requester, donor) pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ContactRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub donor_id: Uuid,
    pub status: ContactRequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl ContactRequest {
    /// The instant disclosure ends, if this request was ever approved.
    pub fn disclosure_expires_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
            .map(|at| at + Duration::minutes(DISCLOSURE_WINDOW_MINUTES))
    }

    /// Whether contact details may be shown at `now`.
    ///
    /// True only for approved records within the window; evaluated against
    /// the stored approval timestamp on every read.
    pub fn is_disclosable_at(&self, now: DateTime<Utc>) -> bool {
        if self.status != ContactRequestStatus::Approved {
            return false;
        }
        match self.disclosure_expires_at() {
            Some(expires_at) => now <= expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn approved_request(approved_at: DateTime<Utc>) -> ContactRequest {
        ContactRequest {
            id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            status: ContactRequestStatus::Approved,
            created_at: approved_at - Duration::hours(1),
            approved_at: Some(approved_at),
        }
    }

    #[test]
    fn disclosable_immediately_after_approval() {
        let approved_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let request = approved_request(approved_at);
        assert!(request.is_disclosable_at(approved_at));
    }

    #[test]
    fn disclosable_just_inside_window() {
        let approved_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let request = approved_request(approved_at);
        let at = approved_at + Duration::minutes(9) + Duration::seconds(59);
        assert!(request.is_disclosable_at(at));
    }

    #[test]
    fn not_disclosable_past_window() {
        let approved_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let request = approved_request(approved_at);
        let at = approved_at + Duration::minutes(10) + Duration::seconds(1);
        assert!(!request.is_disclosable_at(at));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let approved_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let request = approved_request(approved_at);
        assert!(request.is_disclosable_at(approved_at + Duration::minutes(10)));
    }

    #[test]
    fn pending_and_rejected_never_disclose() {
        let now = Utc::now();
        let mut request = approved_request(now);
        request.status = ContactRequestStatus::Pending;
        request.approved_at = None;
        assert!(!request.is_disclosable_at(now));

        request.status = ContactRequestStatus::Rejected;
        assert!(!request.is_disclosable_at(now));
    }

    #[test]
    fn approved_without_timestamp_does_not_disclose() {
        let mut request = approved_request(Utc::now());
        request.approved_at = None;
        assert!(!request.is_disclosable_at(Utc::now()));
        assert!(request.disclosure_expires_at().is_none());
    }

    #[test]
    fn expiry_is_ten_minutes_after_approval() {
        let approved_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let request = approved_request(approved_at);
        assert_eq!(
            request.disclosure_expires_at().unwrap(),
            approved_at + Duration::minutes(10)
        );
    }

    #[test]
    fn decision_deserializes_lowercase() {
        let approve: ContactDecision = serde_json::from_str("\"approve\"").unwrap();
        assert_eq!(approve, ContactDecision::Approve);
        let reject: ContactDecision = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(reject, ContactDecision::Reject);
    }
}
