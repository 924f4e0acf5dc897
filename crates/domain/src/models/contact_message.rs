//! Contact-us message domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A message submitted through the public contact form. Read state is for
/// the admin inbox only; there is no workflow beyond read/unread.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes() {
        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: "A Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            body: "How do I register as a donor?".to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"is_read\":false"));
    }
}
