use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub requester_id: Uuid,
    pub space_id: Uuid,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub location_note: Option<String>,
    pub activity_note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ActorQueryParams {
    /// Whose visibility scope to apply to the listing.
    pub actor_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WorkflowActionRequest {
    pub actor_id: Uuid,
    /// One of `approve`, `reject`, `cancel`.
    pub action: String,
    /// Required for `reject`, optional for `cancel`.
    pub reason: Option<String>,
    /// Stored when the secretariat approves.
    pub secretariat_note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelReservationRequest {
    pub requester_id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub id: String,
    pub requester_id: String,
    /// Display name of the requester, as the portal's admin table shows it.
    pub requester_name: String,
    pub space_id: String,
    pub space_name: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub status: String,
    pub secretariat_note: Option<String>,
    pub rejection_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub location_note: Option<String>,
    pub activity_note: Option<String>,
    pub forwarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkflowActionResponse {
    pub reservation: ReservationResponse,
    /// Human-readable confirmation of what the action did.
    pub message: String,
}
