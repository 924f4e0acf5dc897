//! Donation request entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::BloodTypeDb;

/// Database enum for donation request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatusDb {
    Open,
    Fulfilled,
    Cancelled,
}

impl From<RequestStatusDb> for domain::models::RequestStatus {
    fn from(status: RequestStatusDb) -> Self {
        match status {
            RequestStatusDb::Open => domain::models::RequestStatus::Open,
            RequestStatusDb::Fulfilled => domain::models::RequestStatus::Fulfilled,
            RequestStatusDb::Cancelled => domain::models::RequestStatus::Cancelled,
        }
    }
}

/// Database row mapping for the donation_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct DonationRequestEntity {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub blood_type_required: BloodTypeDb,
    pub city: String,
    pub hospital_location: String,
    pub donation_date: NaiveDate,
    pub donation_time_start: NaiveTime,
    pub donation_time_end: NaiveTime,
    pub message: Option<String>,
    pub status: RequestStatusDb,
    pub is_broadcast: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DonationRequestEntity> for domain::models::DonationRequest {
    fn from(entity: DonationRequestEntity) -> Self {
        Self {
            id: entity.id,
            requester_id: entity.requester_id,
            blood_type_required: entity.blood_type_required.into(),
            city: entity.city,
            hospital_location: entity.hospital_location,
            donation_date: entity.donation_date,
            donation_time_start: entity.donation_time_start,
            donation_time_end: entity.donation_time_end,
            message: entity.message,
            status: entity.status.into(),
            is_broadcast: entity.is_broadcast,
            created_at: entity.created_at,
        }
    }
}
