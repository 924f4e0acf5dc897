//! User repository: identity storage plus the availability and cooldown
//! transitions.
//!
//! Every availability mutation is a single conditional UPDATE so concurrent
//! callers race on the row, not in application code: of two simultaneous
//! refreshes exactly one performs the write, and both observe the post-state.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{BloodTypeDb, RoleDb, UserEntity};
use crate::metrics::QueryTimer;
use domain::models::COOLDOWN_DAYS;

/// Per-role account counts for the admin dashboard.
#[derive(Debug, Clone, Copy)]
pub struct RoleCounts {
    pub donors: i64,
    pub requesters: i64,
}

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        role: RoleDb,
        name: &str,
        phone: &str,
        email: &str,
        password_hash: &str,
        city: &str,
        blood_type: Option<BloodTypeDb>,
        national_id: Option<&str>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (role, name, phone, email, password_hash, city, blood_type, national_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, role, name, phone, email, password_hash, city, blood_type,
                      national_id, is_available, next_eligible_date, is_active, created_at
            "#,
        )
        .bind(role)
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(password_hash)
        .bind(city)
        .bind(blood_type)
        .bind(national_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, role, name, phone, email, password_hash, city, blood_type,
                   national_id, is_available, next_eligible_date, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, role, name, phone, email, password_hash, city, blood_type,
                   national_id, is_available, next_eligible_date, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a national identifier is already taken.
    pub async fn national_id_exists(&self, national_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("national_id_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE national_id = $1)",
        )
        .bind(national_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List donors that are active and currently available, with optional
    /// city and blood type filters.
    pub async fn list_available_donors(
        &self,
        city: Option<&str>,
        blood_type: Option<BloodTypeDb>,
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_available_donors");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, role, name, phone, email, password_hash, city, blood_type,
                   national_id, is_available, next_eligible_date, is_active, created_at
            FROM users
            WHERE role IN ('donor', 'both')
              AND is_active
              AND is_available
              AND ($1::text IS NULL OR city = $1)
              AND ($2::blood_type IS NULL OR blood_type = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(city)
        .bind(blood_type)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Re-checks a donor's cooldown and flips them back to available once the
    /// eligibility date has passed. Idempotent: the WHERE clause ensures at
    /// most one of any number of concurrent callers performs the write.
    ///
    /// Returns true if this call performed the flip.
    pub async fn refresh_availability(&self, donor_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("refresh_availability");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_available = TRUE, next_eligible_date = NULL
            WHERE id = $1
              AND is_available = FALSE
              AND next_eligible_date IS NOT NULL
              AND next_eligible_date <= CURRENT_DATE
            "#,
        )
        .bind(donor_id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Puts a donor into the standard cooldown. Repeat calls while a dated
    /// cooldown is already running do not extend it.
    pub async fn apply_cooldown(&self, donor_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("apply_cooldown");
        let result = apply_cooldown_on(&self.pool, donor_id).await;
        timer.record();
        result
    }

    /// Toggle a user's active flag (admin soft disable). Single statement so
    /// two concurrent toggles cannot read the same prior state.
    pub async fn toggle_active(&self, user_id: Uuid) -> Result<Option<bool>, sqlx::Error> {
        let timer = QueryTimer::new("toggle_user_active");
        let result = sqlx::query_scalar::<_, bool>(
            "UPDATE users SET is_active = NOT is_active WHERE id = $1 RETURNING is_active",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List users for the admin view, optionally filtered by a name/email
    /// substring.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let pattern = search.map(|s| format!("%{}%", s));
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, role, name, phone, email, password_hash, city, blood_type,
                   national_id, is_available, next_eligible_date, is_active, created_at
            FROM users
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count users matching the admin view filter.
    pub async fn count(&self, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users");
        let pattern = search.map(|s| format!("%{}%", s));
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)",
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Per-role counts for the admin dashboard.
    pub async fn role_counts(&self) -> Result<RoleCounts, sqlx::Error> {
        let timer = QueryTimer::new("user_role_counts");
        let result = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE role IN ('donor', 'both')),
                COUNT(*) FILTER (WHERE role IN ('requester', 'both'))
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map(|(donors, requesters)| RoleCounts { donors, requesters });
        timer.record();
        result
    }
}

/// The cooldown statement, reusable inside the approval and completion
/// transactions. The guard skips donors already in a dated cooldown so a
/// repeat application never pushes the eligibility date out.
pub(crate) async fn apply_cooldown_on<'e, E>(executor: E, donor_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE users
        SET is_available = FALSE, next_eligible_date = CURRENT_DATE + $2::int
        WHERE id = $1
          AND (is_available = TRUE OR next_eligible_date IS NULL)
        "#,
    )
    .bind(donor_id)
    .bind(COOLDOWN_DAYS as i32)
    .execute(executor)
    .await
    .map(|r| r.rows_affected() > 0)
}

/// Marks a donor unavailable without an eligibility date, used by the
/// acceptance transaction. Fails closed: zero rows means the donor was
/// already unavailable (or missing) and the caller must abort.
pub(crate) async fn mark_unavailable_on<'e, E>(
    executor: E,
    donor_id: Uuid,
) -> Result<bool, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE users
        SET is_available = FALSE
        WHERE id = $1 AND is_available = TRUE AND is_active = TRUE
        "#,
    )
    .bind(donor_id)
    .execute(executor)
    .await
    .map(|r| r.rows_affected() > 0)
}
