//! Notification payloads for the outbound email sink.
//!
//! Delivery is fire-and-forget with at-least-once semantics: a failed send is
//! logged and retried by the caller at its discretion, and never rolls back
//! the state transition that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ContactRequestStatus;

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ContactRequestDecided,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::ContactRequestDecided => write!(f, "contact_request_decided"),
        }
    }
}

/// Payload sent to the requester when a donor decides their contact request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContactDecisionNotification {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub contact_request_id: Uuid,
    pub requester_email: String,
    pub status: ContactRequestStatus,
    /// Present only on approval: when the disclosure window closes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosure_expires_at: Option<DateTime<Utc>>,
    pub decided_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_type_display() {
        assert_eq!(
            NotificationType::ContactRequestDecided.to_string(),
            "contact_request_decided"
        );
    }

    #[test]
    fn approval_payload_serializes_expiry() {
        let payload = ContactDecisionNotification {
            notification_type: NotificationType::ContactRequestDecided,
            contact_request_id: Uuid::new_v4(),
            requester_email: "requester@example.com".to_string(),
            status: ContactRequestStatus::Approved,
            disclosure_expires_at: Some(Utc::now()),
            decided_at: Utc::now(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"type\":\"contact_request_decided\""));
        assert!(json.contains("disclosure_expires_at"));
    }

    #[test]
    fn rejection_payload_omits_expiry() {
        let payload = ContactDecisionNotification {
            notification_type: NotificationType::ContactRequestDecided,
            contact_request_id: Uuid::new_v4(),
            requester_email: "requester@example.com".to_string(),
            status: ContactRequestStatus::Rejected,
            disclosure_expires_at: None,
            decided_at: Utc::now(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("disclosure_expires_at"));
    }
}
