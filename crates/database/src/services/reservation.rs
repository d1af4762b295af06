use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use futures::future::try_join;
use log::warn;
use models::{
    status::ReservationStatus,
    visibility::{self, VisibilityScope},
    workflow::{self, ActionPayload, Actor, WorkflowAction},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    entities::{reservation, space, user},
    error::ServiceError,
    notify::Notifier,
    services::{space::SpaceService, user::UserService},
};

/// Input for a new reservation request.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub requester_id: Uuid,
    pub space_id: Uuid,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub location_note: Option<String>,
    pub activity_note: Option<String>,
}

/// A reservation row together with the display names the portal shows
/// alongside it, so callers don't have to look them up one by one.
#[derive(Debug, Clone)]
pub struct ReservationRecord {
    pub reservation: reservation::Model,
    pub requester_name: String,
    pub space_name: String,
}

pub struct ReservationService;

impl ReservationService {
    /// Creates a reservation at `PendingSecretariat`. The time range is
    /// validated and both the requester and the space must exist before
    /// anything is written.
    pub async fn create(
        db: &DatabaseConnection,
        input: NewReservation,
    ) -> Result<ReservationRecord, ServiceError> {
        workflow::validate_time_range(input.starts_at, input.ends_at)
            .map_err(ServiceError::from)?;

        let (requester, space) = try_join(
            UserService::get(db, input.requester_id),
            SpaceService::get(db, input.space_id),
        )
        .await?;

        let now = Utc::now().naive_utc();
        let model = reservation::ActiveModel {
            id: Set(Uuid::new_v4()),
            requester_id: Set(input.requester_id),
            space_id: Set(input.space_id),
            starts_at: Set(input.starts_at),
            ends_at: Set(input.ends_at),
            status: Set(ReservationStatus::PendingSecretariat),
            secretariat_note: Set(None),
            rejection_reason: Set(None),
            cancel_reason: Set(None),
            location_note: Set(input.location_note),
            activity_note: Set(input.activity_note),
            forwarded_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(ReservationRecord {
            reservation: model.insert(db).await?,
            requester_name: requester.name,
            space_name: space.name,
        })
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<reservation::Model, ServiceError> {
        reservation::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("reservation"))
    }

    /// Lists reservations visible to the actor, per the central visibility
    /// rule. The filtering happens here, once, so no caller re-derives it.
    pub async fn list_for_actor(
        db: &DatabaseConnection,
        actor_id: Uuid,
    ) -> Result<Vec<ReservationRecord>, ServiceError> {
        let actor = UserService::get(db, actor_id).await?;
        let scope = visibility::scope_for(actor.role, actor.id);

        let query = reservation::Entity::find();
        let query = match scope {
            VisibilityScope::All => query,
            VisibilityScope::OwnedBy(user_id) => {
                query.filter(reservation::Column::RequesterId.eq(user_id))
            }
            VisibilityScope::Forwarded => {
                query.filter(reservation::Column::ForwardedAt.is_not_null())
            }
        };

        let rows = query
            .order_by_asc(reservation::Column::StartsAt)
            .all(db)
            .await?;

        Self::with_names(db, rows).await
    }

    pub async fn list_for_requester(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<Vec<ReservationRecord>, ServiceError> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::RequesterId.eq(user_id))
            .order_by_asc(reservation::Column::StartsAt)
            .all(db)
            .await?;

        Self::with_names(db, rows).await
    }

    /// Applies a workflow action inside a single transaction.
    ///
    /// The status stored in the row is the precondition: it is re-read inside
    /// the transaction and the update is filtered on it, so a concurrent
    /// action that already moved the reservation makes this one fail with
    /// `StaleState` instead of double-applying.
    pub async fn apply_action(
        db: &DatabaseConnection,
        notifier: &dyn Notifier,
        reservation_id: Uuid,
        actor_id: Uuid,
        action: WorkflowAction,
        payload: ActionPayload,
    ) -> Result<(ReservationRecord, &'static str), ServiceError> {
        let actor = UserService::get(db, actor_id).await?;

        let txn = db.begin().await?;

        let stored = reservation::Entity::find_by_id(reservation_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("reservation"))?;

        let transition = workflow::plan(
            stored.status,
            action,
            &Actor {
                id: actor.id,
                role: actor.role,
            },
            stored.requester_id,
            &payload,
        )
        .map_err(ServiceError::from)?;

        let now = Utc::now().naive_utc();
        let mut update = reservation::Entity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(transition.next))
            .col_expr(reservation::Column::UpdatedAt, Expr::value(now));

        if let Some(reason) = &transition.rejection_reason {
            update = update.col_expr(
                reservation::Column::RejectionReason,
                Expr::value(reason.clone()),
            );
        }
        if let Some(note) = &transition.secretariat_note {
            update = update.col_expr(
                reservation::Column::SecretariatNote,
                Expr::value(note.clone()),
            );
        }
        if let Some(reason) = &transition.cancel_reason {
            update = update.col_expr(
                reservation::Column::CancelReason,
                Expr::value(reason.clone()),
            );
        }
        if transition.forwarded {
            update = update.col_expr(reservation::Column::ForwardedAt, Expr::value(now));
        }

        // Compare-and-swap on the status read above. Zero rows means another
        // request moved the reservation first.
        let result = update
            .filter(reservation::Column::Id.eq(reservation_id))
            .filter(reservation::Column::Status.eq(stored.status))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ServiceError::StaleState);
        }

        txn.commit().await?;

        // The returned row is the one this transaction produced, not a fresh
        // read that could already reflect a later transition.
        let updated = reservation::Model {
            status: transition.next,
            updated_at: now,
            rejection_reason: transition
                .rejection_reason
                .clone()
                .or(stored.rejection_reason.clone()),
            secretariat_note: transition
                .secretariat_note
                .clone()
                .or(stored.secretariat_note.clone()),
            cancel_reason: transition
                .cancel_reason
                .clone()
                .or(stored.cancel_reason.clone()),
            forwarded_at: if transition.forwarded {
                Some(now)
            } else {
                stored.forwarded_at
            },
            ..stored
        };

        // Best-effort: a failed dispatch never rolls back the transition.
        let text = notification_text(&updated, &transition.rejection_reason);
        if let Err(err) = notifier.notify(updated.requester_id, &text).await {
            warn!("notification for reservation {reservation_id} not delivered: {err}");
        }

        let requester = UserService::get(db, updated.requester_id).await?;
        let space = SpaceService::get(db, updated.space_id).await?;

        Ok((
            ReservationRecord {
                reservation: updated,
                requester_name: requester.name,
                space_name: space.name,
            },
            transition.message,
        ))
    }

    /// Convenience wrapper for the requester-facing cancel operation.
    pub async fn cancel(
        db: &DatabaseConnection,
        notifier: &dyn Notifier,
        reservation_id: Uuid,
        requester_id: Uuid,
        reason: Option<String>,
    ) -> Result<ReservationRecord, ServiceError> {
        let payload = ActionPayload {
            reason,
            secretariat_note: None,
        };

        let (updated, _) = Self::apply_action(
            db,
            notifier,
            reservation_id,
            requester_id,
            WorkflowAction::Cancel,
            payload,
        )
        .await?;

        Ok(updated)
    }

    /// Resolves requester and space names for a page of rows with one query
    /// per table instead of one per row.
    async fn with_names(
        db: &DatabaseConnection,
        rows: Vec<reservation::Model>,
    ) -> Result<Vec<ReservationRecord>, ServiceError> {
        let user_ids: Vec<Uuid> = rows.iter().map(|r| r.requester_id).collect();
        let space_ids: Vec<Uuid> = rows.iter().map(|r| r.space_id).collect();

        let user_names: HashMap<Uuid, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let space_names: HashMap<Uuid, String> = space::Entity::find()
            .filter(space::Column::Id.is_in(space_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|reservation| ReservationRecord {
                requester_name: user_names
                    .get(&reservation.requester_id)
                    .cloned()
                    .unwrap_or_default(),
                space_name: space_names
                    .get(&reservation.space_id)
                    .cloned()
                    .unwrap_or_default(),
                reservation,
            })
            .collect())
    }
}

fn notification_text(
    reservation: &reservation::Model,
    rejection_reason: &Option<String>,
) -> String {
    let mut text = format!(
        "Your reservation for {} is now {}",
        reservation.starts_at, reservation.status
    );

    if let Some(reason) = rejection_reason {
        text.push_str(": ");
        text.push_str(reason);
    }

    text
}
