//! Contact request routes: the request/approve/reject protocol.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::{ContactDecision, ContactRequest, ContactRequestStatus};
use domain::services::notification::{ContactDecisionNotification, NotificationType};
use persistence::entities::ContactRequestEntity;
use persistence::repositories::{ContactRequestRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Request body for asking to see a donor's contact details.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateContactRequestBody {
    pub donor_id: Uuid,
}

/// Response for a contact request creation or re-ask.
///
/// A re-ask is not a failure: the existing record's status comes back with
/// `already_requested` set, and no duplicate row is created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ContactRequestResponse {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub status: ContactRequestStatus,
    pub already_requested: bool,
    pub created_at: DateTime<Utc>,
}

/// A pending item in the donor's inbox.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingContactRequestItem {
    pub id: Uuid,
    pub requester: RequesterBrief,
    pub created_at: DateTime<Utc>,
}

/// Brief requester info for the donor inbox.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RequesterBrief {
    pub id: Uuid,
    pub name: String,
    pub city: String,
}

/// Request body for deciding a contact request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DecideBody {
    pub decision: ContactDecision,
}

/// Response after a decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DecideResponse {
    pub id: Uuid,
    pub status: ContactRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosure_expires_at: Option<DateTime<Utc>>,
}

/// Ask to see a donor's contact details.
///
/// POST /api/v1/contact-requests
pub async fn create_contact_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateContactRequestBody>,
) -> Result<(StatusCode, Json<ContactRequestResponse>), ApiError> {
    auth.require_requester()?;

    if body.donor_id == auth.user_id {
        return Err(ApiError::Validation(
            "Cannot request your own contact details".to_string(),
        ));
    }

    let users = UserRepository::new(state.pool.clone());
    let donor = users
        .find_by_id(body.donor_id)
        .await?
        .filter(|u| domain::models::Role::from(u.role).is_donor() && u.is_active)
        .ok_or_else(|| ApiError::NotFound("Donor not found".to_string()))?;

    let contacts = ContactRequestRepository::new(state.pool.clone());
    match contacts.insert_pending(auth.user_id, donor.id).await? {
        Some(entity) => {
            counter!("contact_requests_created_total").increment(1);
            tracing::info!(
                contact_request_id = %entity.id,
                requester_id = %auth.user_id,
                donor_id = %donor.id,
                "Contact request created"
            );
            Ok((
                StatusCode::CREATED,
                Json(response_from(entity, false)),
            ))
        }
        None => {
            // A record already exists for this pair; report its status
            // instead of erroring or duplicating.
            let existing = contacts
                .find_pair(auth.user_id, donor.id)
                .await?
                .ok_or_else(|| {
                    ApiError::Internal("Contact request vanished during insert".to_string())
                })?;
            Ok((StatusCode::OK, Json(response_from(existing, true))))
        }
    }
}

/// Pending contact requests addressed to the calling donor.
///
/// GET /api/v1/contact-requests/pending
pub async fn list_pending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PendingContactRequestItem>>, ApiError> {
    auth.require_donor()?;

    let contacts = ContactRequestRepository::new(state.pool.clone());
    let items = contacts
        .list_pending_for_donor(auth.user_id)
        .await?
        .into_iter()
        .map(|entity| PendingContactRequestItem {
            id: entity.id,
            requester: RequesterBrief {
                id: entity.requester_id,
                name: entity.requester_name,
                city: entity.requester_city,
            },
            created_at: entity.created_at,
        })
        .collect();

    Ok(Json(items))
}

/// Approve or reject a pending contact request. Only the target donor may
/// decide, and only once; approval also starts the donor's cooldown.
///
/// POST /api/v1/contact-requests/{request_id}/decide
pub async fn decide(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    auth: AuthUser,
    Json(body): Json<DecideBody>,
) -> Result<Json<DecideResponse>, ApiError> {
    auth.require_donor()?;

    let contacts = ContactRequestRepository::new(state.pool.clone());
    let updated = match body.decision {
        ContactDecision::Approve => contacts.approve(request_id, auth.user_id).await?,
        ContactDecision::Reject => contacts.reject(request_id, auth.user_id).await?,
    };

    let Some(entity) = updated else {
        // Zero rows matched: work out which precondition failed.
        return Err(match contacts.find_by_id(request_id).await? {
            None => ApiError::NotFound("Contact request not found".to_string()),
            Some(other) if other.donor_id != auth.user_id => {
                ApiError::Forbidden("Only the requested donor may decide".to_string())
            }
            Some(_) => ApiError::Conflict("Contact request already decided".to_string()),
        });
    };

    let record: ContactRequest = entity.into();
    tracing::info!(
        contact_request_id = %record.id,
        donor_id = %auth.user_id,
        status = %record.status,
        "Contact request decided"
    );

    if record.status == ContactRequestStatus::Approved {
        counter!("contact_requests_approved_total").increment(1);
        notify_requester(&state, &record).await;
    }

    Ok(Json(DecideResponse {
        id: record.id,
        status: record.status,
        approved_at: record.approved_at,
        disclosure_expires_at: record.disclosure_expires_at(),
    }))
}

/// Fire-and-forget approval notification. The approval is already committed;
/// a failed send is logged and never unwinds it.
async fn notify_requester(state: &AppState, record: &ContactRequest) {
    let users = UserRepository::new(state.pool.clone());
    let requester = match users.find_by_id(record.requester_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(requester_id = %record.requester_id, "Requester missing, skipping notification");
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load requester for notification");
            return;
        }
    };

    let notification = ContactDecisionNotification {
        notification_type: NotificationType::ContactRequestDecided,
        contact_request_id: record.id,
        requester_email: requester.email,
        status: record.status,
        disclosure_expires_at: record.disclosure_expires_at(),
        decided_at: record.approved_at.unwrap_or_else(Utc::now),
    };

    if let Err(e) = state.email.send_contact_decision(&notification).await {
        tracing::warn!(error = %e, "Approval notification failed");
    }
}

fn response_from(entity: ContactRequestEntity, already_requested: bool) -> ContactRequestResponse {
    ContactRequestResponse {
        id: entity.id,
        donor_id: entity.donor_id,
        status: entity.status.into(),
        already_requested,
        created_at: entity.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decide_body_parses_decisions() {
        let body: DecideBody = serde_json::from_str(r#"{"decision":"approve"}"#).unwrap();
        assert_eq!(body.decision, ContactDecision::Approve);
        let body: DecideBody = serde_json::from_str(r#"{"decision":"reject"}"#).unwrap();
        assert_eq!(body.decision, ContactDecision::Reject);
        assert!(serde_json::from_str::<DecideBody>(r#"{"decision":"maybe"}"#).is_err());
    }

    #[test]
    fn re_ask_response_carries_existing_status() {
        let response = ContactRequestResponse {
            id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            status: ContactRequestStatus::Pending,
            already_requested: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"already_requested\":true"));
        assert!(json.contains("\"status\":\"pending\""));
    }

    #[test]
    fn decide_response_omits_absent_fields() {
        let response = DecideResponse {
            id: Uuid::new_v4(),
            status: ContactRequestStatus::Rejected,
            approved_at: None,
            disclosure_expires_at: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("approved_at"));
        assert!(!json.contains("disclosure_expires_at"));
    }
}
