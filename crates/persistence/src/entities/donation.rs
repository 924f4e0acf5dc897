//! Donation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for donation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "donation_status", rename_all = "lowercase")]
pub enum DonationStatusDb {
    Committed,
    Completed,
}

impl From<DonationStatusDb> for domain::models::DonationStatus {
    fn from(status: DonationStatusDb) -> Self {
        match status {
            DonationStatusDb::Committed => domain::models::DonationStatus::Committed,
            DonationStatusDb::Completed => domain::models::DonationStatus::Completed,
        }
    }
}

/// Database row mapping for the donations table.
#[derive(Debug, Clone, FromRow)]
pub struct DonationEntity {
    pub id: Uuid,
    pub request_id: Uuid,
    pub donor_id: Uuid,
    pub status: DonationStatusDb,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<DonationEntity> for domain::models::Donation {
    fn from(entity: DonationEntity) -> Self {
        Self {
            id: entity.id,
            request_id: entity.request_id,
            donor_id: entity.donor_id,
            status: entity.status.into(),
            completed_at: entity.completed_at,
            created_at: entity.created_at,
        }
    }
}
