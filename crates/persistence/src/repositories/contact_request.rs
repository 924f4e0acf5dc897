//! Contact request repository: the disclosure protocol's persisted state
//! machine.
//!
//! Decisions are conditional UPDATEs keyed on (id, donor_id, pending) so a
//! decision by anyone but the target donor, or a second decision on the same
//! record, matches zero rows instead of overwriting state.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ContactRequestEntity, PendingContactRequestEntity};
use crate::metrics::QueryTimer;
use crate::repositories::user::apply_cooldown_on;

/// Repository for contact request database operations.
#[derive(Clone)]
pub struct ContactRequestRepository {
    pool: PgPool,
}

impl ContactRequestRepository {
    /// Creates a new ContactRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a pending request for the pair, or returns None when a record
    /// already exists. The unique (requester_id, donor_id) constraint makes
    /// concurrent first asks collapse to a single row.
    pub async fn insert_pending(
        &self,
        requester_id: Uuid,
        donor_id: Uuid,
    ) -> Result<Option<ContactRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_pending_contact_request");
        let result = sqlx::query_as::<_, ContactRequestEntity>(
            r#"
            INSERT INTO contact_requests (requester_id, donor_id)
            VALUES ($1, $2)
            ON CONFLICT (requester_id, donor_id) DO NOTHING
            RETURNING id, requester_id, donor_id, status, created_at, approved_at
            "#,
        )
        .bind(requester_id)
        .bind(donor_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The record for a (requester, donor) pair, if one exists.
    pub async fn find_pair(
        &self,
        requester_id: Uuid,
        donor_id: Uuid,
    ) -> Result<Option<ContactRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_contact_request_pair");
        let result = sqlx::query_as::<_, ContactRequestEntity>(
            r#"
            SELECT id, requester_id, donor_id, status, created_at, approved_at
            FROM contact_requests
            WHERE requester_id = $1 AND donor_id = $2
            "#,
        )
        .bind(requester_id)
        .bind(donor_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a contact request by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_contact_request_by_id");
        let result = sqlx::query_as::<_, ContactRequestEntity>(
            r#"
            SELECT id, requester_id, donor_id, status, created_at, approved_at
            FROM contact_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Pending requests addressed to a donor, with requester display fields,
    /// newest first.
    pub async fn list_pending_for_donor(
        &self,
        donor_id: Uuid,
    ) -> Result<Vec<PendingContactRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_contact_requests");
        let result = sqlx::query_as::<_, PendingContactRequestEntity>(
            r#"
            SELECT cr.id, cr.requester_id, u.name AS requester_name,
                   u.city AS requester_city, cr.created_at
            FROM contact_requests cr
            JOIN users u ON cr.requester_id = u.id
            WHERE cr.donor_id = $1 AND cr.status = 'pending'
            ORDER BY cr.created_at DESC
            "#,
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Approves a pending request and applies the donor cooldown in the same
    /// transaction, stamping the approval instant from the database clock.
    ///
    /// Returns None when the record is not pending or not addressed to this
    /// donor; in that case nothing is written.
    pub async fn approve(
        &self,
        id: Uuid,
        donor_id: Uuid,
    ) -> Result<Option<ContactRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("approve_contact_request");
        let result = self.approve_inner(id, donor_id).await;
        timer.record();
        result
    }

    async fn approve_inner(
        &self,
        id: Uuid,
        donor_id: Uuid,
    ) -> Result<Option<ContactRequestEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let approved = sqlx::query_as::<_, ContactRequestEntity>(
            r#"
            UPDATE contact_requests
            SET status = 'approved', approved_at = NOW()
            WHERE id = $1 AND donor_id = $2 AND status = 'pending'
            RETURNING id, requester_id, donor_id, status, created_at, approved_at
            "#,
        )
        .bind(id)
        .bind(donor_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(approved) = approved else {
            return Ok(None);
        };

        apply_cooldown_on(&mut *tx, donor_id).await?;

        tx.commit().await?;
        Ok(Some(approved))
    }

    /// Rejects a pending request. Terminal; returns None when the record is
    /// not pending or not addressed to this donor.
    pub async fn reject(
        &self,
        id: Uuid,
        donor_id: Uuid,
    ) -> Result<Option<ContactRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("reject_contact_request");
        let result = sqlx::query_as::<_, ContactRequestEntity>(
            r#"
            UPDATE contact_requests
            SET status = 'rejected'
            WHERE id = $1 AND donor_id = $2 AND status = 'pending'
            RETURNING id, requester_id, donor_id, status, created_at, approved_at
            "#,
        )
        .bind(id)
        .bind(donor_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
