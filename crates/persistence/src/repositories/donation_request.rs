//! Donation request repository for database operations.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{BloodTypeDb, DonationRequestEntity};
use crate::metrics::QueryTimer;

/// Repository for donation request database operations.
#[derive(Clone)]
pub struct DonationRequestRepository {
    pool: PgPool,
}

impl DonationRequestRepository {
    /// Creates a new DonationRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new donation request. Admin broadcasts use the same path
    /// with `is_broadcast = true`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        requester_id: Uuid,
        blood_type_required: BloodTypeDb,
        city: &str,
        hospital_location: &str,
        donation_date: NaiveDate,
        donation_time_start: NaiveTime,
        donation_time_end: NaiveTime,
        message: Option<&str>,
        is_broadcast: bool,
    ) -> Result<DonationRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_donation_request");
        let result = sqlx::query_as::<_, DonationRequestEntity>(
            r#"
            INSERT INTO donation_requests
                (requester_id, blood_type_required, city, hospital_location,
                 donation_date, donation_time_start, donation_time_end, message, is_broadcast)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, requester_id, blood_type_required, city, hospital_location,
                      donation_date, donation_time_start, donation_time_end, message,
                      status, is_broadcast, created_at
            "#,
        )
        .bind(requester_id)
        .bind(blood_type_required)
        .bind(city)
        .bind(hospital_location)
        .bind(donation_date)
        .bind(donation_time_start)
        .bind(donation_time_end)
        .bind(message)
        .bind(is_broadcast)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a donation request by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DonationRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_donation_request_by_id");
        let result = sqlx::query_as::<_, DonationRequestEntity>(
            r#"
            SELECT id, requester_id, blood_type_required, city, hospital_location,
                   donation_date, donation_time_start, donation_time_end, message,
                   status, is_broadcast, created_at
            FROM donation_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Open requests matching a donor's city and blood type, soonest first.
    pub async fn list_open(
        &self,
        city: &str,
        blood_type: BloodTypeDb,
    ) -> Result<Vec<DonationRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_open_donation_requests");
        let result = sqlx::query_as::<_, DonationRequestEntity>(
            r#"
            SELECT id, requester_id, blood_type_required, city, hospital_location,
                   donation_date, donation_time_start, donation_time_end, message,
                   status, is_broadcast, created_at
            FROM donation_requests
            WHERE status = 'open' AND city = $1 AND blood_type_required = $2
            ORDER BY donation_date ASC
            "#,
        )
        .bind(city)
        .bind(blood_type)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All requests created by one requester, newest first.
    pub async fn list_by_requester(
        &self,
        requester_id: Uuid,
    ) -> Result<Vec<DonationRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_donation_requests_by_requester");
        let result = sqlx::query_as::<_, DonationRequestEntity>(
            r#"
            SELECT id, requester_id, blood_type_required, city, hospital_location,
                   donation_date, donation_time_start, donation_time_end, message,
                   status, is_broadcast, created_at
            FROM donation_requests
            WHERE requester_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count of currently open requests (admin dashboard).
    pub async fn count_open(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_open_donation_requests");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM donation_requests WHERE status = 'open'",
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
