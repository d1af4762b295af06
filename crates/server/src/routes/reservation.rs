use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query},
};
use database::{
    db::create_connection,
    error::ServiceError,
    notify::LogNotifier,
    services::reservation::{NewReservation, ReservationRecord, ReservationService},
};
use models::workflow::{ActionPayload, WorkflowAction};
use sea_orm::prelude::Uuid;

use crate::{
    dtos::reservation::{
        ActorQueryParams, CancelReservationRequest, CreateReservationRequest, ReservationResponse,
        WorkflowActionRequest, WorkflowActionResponse,
    },
    error::ApiError,
};

/// Submit a new reservation request
#[utoipa::path(
    post,
    path = "/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created, pending secretariat review", body = ReservationResponse),
        (status = 404, description = "Unknown requester or space"),
        (status = 422, description = "Invalid time range"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    Json(payload): Json<CreateReservationRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let created = ReservationService::create(
        &db,
        NewReservation {
            requester_id: payload.requester_id,
            space_id: payload.space_id,
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
            location_note: payload.location_note,
            activity_note: payload.activity_note,
        },
    )
    .await?;

    Ok(Json(to_reservation_response(created)))
}

/// List reservations visible to an actor
#[utoipa::path(
    get,
    path = "/reservations",
    params(ActorQueryParams),
    responses(
        (status = 200, description = "Reservations visible to this actor", body = [ReservationResponse]),
        (status = 404, description = "Unknown actor"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn get_reservations(
    Query(params): Query<ActorQueryParams>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let reservations = ReservationService::list_for_actor(&db, params.actor_id).await?;

    Ok(Json(
        reservations
            .into_iter()
            .map(to_reservation_response)
            .collect(),
    ))
}

/// List a requester's own reservations
#[utoipa::path(
    get,
    path = "/users/{id}/reservations",
    params(
        ("id" = Uuid, Path, description = "Requester's user ID")
    ),
    responses(
        (status = 200, description = "The user's reservations", body = [ReservationResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn get_reservations_for_requester(
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let reservations = ReservationService::list_for_requester(&db, id).await?;

    Ok(Json(
        reservations
            .into_iter()
            .map(to_reservation_response)
            .collect(),
    ))
}

/// Apply a workflow action (approve, reject or cancel) to a reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/workflow",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    request_body = WorkflowActionRequest,
    responses(
        (status = 200, description = "Action applied", body = WorkflowActionResponse),
        (status = 403, description = "The actor may not take this action at this stage"),
        (status = 404, description = "Unknown reservation or actor"),
        (status = 409, description = "The reservation was changed by a concurrent request"),
        (status = 422, description = "Unknown action, or a rejection without a reason"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn apply_workflow_action(
    Path(id): Path<Uuid>,
    Json(payload): Json<WorkflowActionRequest>,
) -> Result<Json<WorkflowActionResponse>, ApiError> {
    let action = WorkflowAction::from_str(&payload.action)
        .map_err(ServiceError::Validation)?;

    let db = create_connection().await.map_err(ServiceError::from)?;

    let (updated, message) = ReservationService::apply_action(
        &db,
        &LogNotifier,
        id,
        payload.actor_id,
        action,
        ActionPayload {
            reason: payload.reason,
            secretariat_note: payload.secretariat_note,
        },
    )
    .await?;

    Ok(Json(WorkflowActionResponse {
        reservation: to_reservation_response(updated),
        message: message.to_owned(),
    }))
}

/// Cancel a pending reservation (original requester only)
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    request_body = CancelReservationRequest,
    responses(
        (status = 200, description = "Reservation cancelled", body = ReservationResponse),
        (status = 403, description = "Only the original requester may cancel, and only while pending"),
        (status = 404, description = "Unknown reservation or requester"),
        (status = 409, description = "The reservation was changed by a concurrent request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reservations"
)]
pub async fn cancel_reservation(
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelReservationRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let cancelled =
        ReservationService::cancel(&db, &LogNotifier, id, payload.requester_id, payload.reason)
            .await?;

    Ok(Json(to_reservation_response(cancelled)))
}

fn to_reservation_response(record: ReservationRecord) -> ReservationResponse {
    let reservation = record.reservation;

    ReservationResponse {
        id: reservation.id.to_string(),
        requester_id: reservation.requester_id.to_string(),
        requester_name: record.requester_name,
        space_id: reservation.space_id.to_string(),
        space_name: record.space_name,
        starts_at: reservation.starts_at,
        ends_at: reservation.ends_at,
        status: reservation.status.to_string(),
        secretariat_note: reservation.secretariat_note,
        rejection_reason: reservation.rejection_reason,
        cancel_reason: reservation.cancel_reason,
        location_note: reservation.location_note,
        activity_note: reservation.activity_note,
        forwarded_at: reservation.forwarded_at,
        created_at: reservation.created_at,
    }
}
