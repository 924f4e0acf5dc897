//! Contact request entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for contact request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "contact_request_status", rename_all = "lowercase")]
pub enum ContactRequestStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<ContactRequestStatusDb> for domain::models::ContactRequestStatus {
    fn from(status: ContactRequestStatusDb) -> Self {
        match status {
            ContactRequestStatusDb::Pending => domain::models::ContactRequestStatus::Pending,
            ContactRequestStatusDb::Approved => domain::models::ContactRequestStatus::Approved,
            ContactRequestStatusDb::Rejected => domain::models::ContactRequestStatus::Rejected,
        }
    }
}

/// Database row mapping for the contact_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct ContactRequestEntity {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub donor_id: Uuid,
    pub status: ContactRequestStatusDb,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl From<ContactRequestEntity> for domain::models::ContactRequest {
    fn from(entity: ContactRequestEntity) -> Self {
        Self {
            id: entity.id,
            requester_id: entity.requester_id,
            donor_id: entity.donor_id,
            status: entity.status.into(),
            created_at: entity.created_at,
            approved_at: entity.approved_at,
        }
    }
}

/// Pending contact request joined with the requester's display fields, for
/// the donor's inbox.
#[derive(Debug, Clone, FromRow)]
pub struct PendingContactRequestEntity {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub requester_name: String,
    pub requester_city: String,
    pub created_at: DateTime<Utc>,
}
