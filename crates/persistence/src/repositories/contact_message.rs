//! Contact-us message repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ContactMessageEntity;
use crate::metrics::QueryTimer;

/// Repository for contact-us message database operations.
#[derive(Clone)]
pub struct ContactMessageRepository {
    pool: PgPool,
}

impl ContactMessageRepository {
    /// Creates a new ContactMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a message submitted through the public contact form.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<ContactMessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_contact_message");
        let result = sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            INSERT INTO contact_messages (name, email, body)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, body, is_read, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All messages, newest first.
    pub async fn list_all(&self) -> Result<Vec<ContactMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_contact_messages");
        let result = sqlx::query_as::<_, ContactMessageEntity>(
            r#"
            SELECT id, name, email, body, is_read, created_at
            FROM contact_messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count of unread messages for the admin dashboard badge.
    pub async fn unread_count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_unread_contact_messages");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_messages WHERE is_read = FALSE",
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a message read. Returns false if the message does not exist.
    pub async fn mark_read(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_contact_message_read");
        let result = sqlx::query("UPDATE contact_messages SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }
}
