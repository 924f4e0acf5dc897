//! Email notification service.
//!
//! The notification sink is a fire-and-forget collaborator: callers log a
//! failed send and move on, because the state transition that produced the
//! notification has already committed. The `console` provider logs the
//! message, which stands in for a real delivery channel.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use domain::models::ContactRequestStatus;
use domain::services::notification::ContactDecisionNotification;

use crate::config::EmailConfig;

/// Errors that can occur during notification sends.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Unknown email provider: {0}")]
    UnknownProvider(String),
}

/// An outbound email message.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Notification service.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Send a message through the configured provider.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(to = %message.to, subject = %message.subject, "Email disabled, skipping send");
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => {
                info!(
                    from = %self.config.sender_email,
                    to = %message.to,
                    subject = %message.subject,
                    body = %message.body,
                    "Outbound email"
                );
                Ok(())
            }
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::UnknownProvider(provider.to_string()))
            }
        }
    }

    /// Notify a requester that their contact request was decided.
    pub async fn send_contact_decision(
        &self,
        notification: &ContactDecisionNotification,
    ) -> Result<(), EmailError> {
        self.send(compose_contact_decision(notification)).await
    }
}

fn compose_contact_decision(notification: &ContactDecisionNotification) -> EmailMessage {
    let (subject, body) = match notification.status {
        ContactRequestStatus::Approved => (
            "Your contact request was approved".to_string(),
            match notification.disclosure_expires_at {
                Some(expires_at) => format!(
                    "The donor approved your contact request. Log in to view their \
                     contact details before {}.",
                    expires_at.to_rfc3339()
                ),
                None => "The donor approved your contact request. Log in to view their \
                         contact details."
                    .to_string(),
            },
        ),
        _ => (
            "Your contact request was declined".to_string(),
            "The donor declined your contact request. You can browse other available donors."
                .to_string(),
        ),
    };

    EmailMessage {
        to: notification.requester_email.clone(),
        subject,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::services::notification::NotificationType;
    use uuid::Uuid;

    fn notification(status: ContactRequestStatus) -> ContactDecisionNotification {
        ContactDecisionNotification {
            notification_type: NotificationType::ContactRequestDecided,
            contact_request_id: Uuid::new_v4(),
            requester_email: "requester@example.com".to_string(),
            status,
            disclosure_expires_at: match status {
                ContactRequestStatus::Approved => Some(Utc::now()),
                _ => None,
            },
            decided_at: Utc::now(),
        }
    }

    #[test]
    fn approval_email_mentions_window() {
        let message = compose_contact_decision(&notification(ContactRequestStatus::Approved));
        assert_eq!(message.to, "requester@example.com");
        assert!(message.subject.contains("approved"));
        assert!(message.body.contains("before"));
    }

    #[test]
    fn rejection_email_is_terminal() {
        let message = compose_contact_decision(&notification(ContactRequestStatus::Rejected));
        assert!(message.subject.contains("declined"));
    }

    #[tokio::test]
    async fn disabled_service_skips_send() {
        let service = EmailService::new(EmailConfig::default());
        let result = service
            .send(EmailMessage {
                to: "x@example.com".to_string(),
                subject: "s".to_string(),
                body: "b".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unknown_provider_errors() {
        let service = EmailService::new(EmailConfig {
            enabled: true,
            provider: "sendgrid".to_string(),
            ..EmailConfig::default()
        });
        let result = service
            .send(EmailMessage {
                to: "x@example.com".to_string(),
                subject: "s".to_string(),
                body: "b".to_string(),
            })
            .await;
        assert!(matches!(result, Err(EmailError::UnknownProvider(_))));
    }
}
