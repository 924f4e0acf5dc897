//! Donation repository: the acceptance and completion transactions.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{DonationEntity, RequestStatusDb};
use crate::metrics::QueryTimer;
use crate::repositories::user::{apply_cooldown_on, mark_unavailable_on};

/// Failure modes of the acceptance transaction.
#[derive(Debug, Error)]
pub enum AcceptError {
    #[error("Donation request not found")]
    RequestNotFound,

    #[error("Donation request already fulfilled")]
    AlreadyFulfilled,

    #[error("Donor is not currently available")]
    DonorUnavailable,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Failure modes of the completion transaction.
#[derive(Debug, Error)]
pub enum CompleteError {
    #[error("Donation not found")]
    NotFound,

    #[error("Donation is not in a completable state")]
    InvalidTransition,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for donation (acceptance) database operations.
#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    /// Creates a new DonationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Binds a donor to an open request: inserts the donation, fulfills the
    /// request, and marks the donor unavailable, all in one transaction.
    ///
    /// The request row is locked first so concurrent acceptors serialize on
    /// it; the unique index on donations.request_id is the backstop. Exactly
    /// one caller succeeds, the rest see `AlreadyFulfilled` or
    /// `DonorUnavailable`.
    pub async fn accept(
        &self,
        request_id: Uuid,
        donor_id: Uuid,
    ) -> Result<DonationEntity, AcceptError> {
        let timer = QueryTimer::new("accept_donation_request");
        let result = self.accept_inner(request_id, donor_id).await;
        timer.record();
        result
    }

    async fn accept_inner(
        &self,
        request_id: Uuid,
        donor_id: Uuid,
    ) -> Result<DonationEntity, AcceptError> {
        let mut tx = self.pool.begin().await?;

        let status = sqlx::query_scalar::<_, RequestStatusDb>(
            "SELECT status FROM donation_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;

        match status {
            None => return Err(AcceptError::RequestNotFound),
            Some(RequestStatusDb::Open) => {}
            Some(_) => return Err(AcceptError::AlreadyFulfilled),
        }

        if !mark_unavailable_on(&mut *tx, donor_id).await? {
            return Err(AcceptError::DonorUnavailable);
        }

        sqlx::query("UPDATE donation_requests SET status = 'fulfilled' WHERE id = $1")
            .bind(request_id)
            .execute(&mut *tx)
            .await?;

        let donation = sqlx::query_as::<_, DonationEntity>(
            r#"
            INSERT INTO donations (request_id, donor_id)
            VALUES ($1, $2)
            RETURNING id, request_id, donor_id, status, completed_at, created_at
            "#,
        )
        .bind(request_id)
        .bind(donor_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AcceptError::AlreadyFulfilled
            }
            _ => AcceptError::Database(e),
        })?;

        tx.commit().await?;
        Ok(donation)
    }

    /// Marks a committed donation completed and starts the donor's standard
    /// cooldown, in one transaction. Only the bound donor may complete.
    pub async fn complete(
        &self,
        donation_id: Uuid,
        donor_id: Uuid,
    ) -> Result<DonationEntity, CompleteError> {
        let timer = QueryTimer::new("complete_donation");
        let result = self.complete_inner(donation_id, donor_id).await;
        timer.record();
        result
    }

    async fn complete_inner(
        &self,
        donation_id: Uuid,
        donor_id: Uuid,
    ) -> Result<DonationEntity, CompleteError> {
        let mut tx = self.pool.begin().await?;

        let donation = sqlx::query_as::<_, DonationEntity>(
            r#"
            UPDATE donations
            SET status = 'completed', completed_at = NOW()
            WHERE id = $1 AND donor_id = $2 AND status = 'committed'
            RETURNING id, request_id, donor_id, status, completed_at, created_at
            "#,
        )
        .bind(donation_id)
        .bind(donor_id)
        .fetch_optional(&mut *tx)
        .await?;

        let donation = match donation {
            Some(d) => d,
            None => {
                // Distinguish a missing/foreign donation from a repeat completion.
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM donations WHERE id = $1 AND donor_id = $2)",
                )
                .bind(donation_id)
                .bind(donor_id)
                .fetch_one(&mut *tx)
                .await?;
                return Err(if exists {
                    CompleteError::InvalidTransition
                } else {
                    CompleteError::NotFound
                });
            }
        };

        apply_cooldown_on(&mut *tx, donor_id).await?;

        tx.commit().await?;
        Ok(donation)
    }

    /// Find the donation bound to a request, if any.
    pub async fn find_by_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<DonationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_donation_by_request");
        let result = sqlx::query_as::<_, DonationEntity>(
            r#"
            SELECT id, request_id, donor_id, status, completed_at, created_at
            FROM donations
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A donor's donation history, newest first.
    pub async fn list_by_donor(&self, donor_id: Uuid) -> Result<Vec<DonationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_donations_by_donor");
        let result = sqlx::query_as::<_, DonationEntity>(
            r#"
            SELECT id, request_id, donor_id, status, completed_at, created_at
            FROM donations
            WHERE donor_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
