use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{role::Role, status::ReservationStatus};

/// The three actions callers may request against a reservation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Approve,
    Reject,
    Cancel,
}

impl FromStr for WorkflowAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "cancel" => Ok(Self::Cancel),
            _ => Err(format!("Unknown workflow action: {s}")),
        }
    }
}

impl Display for WorkflowAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

/// Who may take a given transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The actor must hold this role.
    Role(Role),
    /// The actor must be the user who created the reservation.
    OriginalRequester,
}

/// One row of the transition table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rule {
    pub current: ReservationStatus,
    pub action: WorkflowAction,
    pub requirement: Requirement,
    pub next: ReservationStatus,
}

/// The authoritative transition table. Adding a state is an edit here, not a
/// new branch somewhere else.
pub const TRANSITIONS: [Rule; 6] = [
    Rule {
        current: ReservationStatus::PendingSecretariat,
        action: WorkflowAction::Approve,
        requirement: Requirement::Role(Role::Secretariat),
        next: ReservationStatus::PendingProducer,
    },
    Rule {
        current: ReservationStatus::PendingSecretariat,
        action: WorkflowAction::Reject,
        requirement: Requirement::Role(Role::Secretariat),
        next: ReservationStatus::Rejected,
    },
    Rule {
        current: ReservationStatus::PendingProducer,
        action: WorkflowAction::Approve,
        requirement: Requirement::Role(Role::EventProducer),
        next: ReservationStatus::Approved,
    },
    Rule {
        current: ReservationStatus::PendingProducer,
        action: WorkflowAction::Reject,
        requirement: Requirement::Role(Role::EventProducer),
        next: ReservationStatus::Rejected,
    },
    Rule {
        current: ReservationStatus::PendingSecretariat,
        action: WorkflowAction::Cancel,
        requirement: Requirement::OriginalRequester,
        next: ReservationStatus::Cancelled,
    },
    Rule {
        current: ReservationStatus::PendingProducer,
        action: WorkflowAction::Cancel,
        requirement: Requirement::OriginalRequester,
        next: ReservationStatus::Cancelled,
    },
];

/// Optional free-text input accompanying a workflow action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionPayload {
    /// Required (non-empty) for `reject`, optional for `cancel`.
    pub reason: Option<String>,
    /// Stored when the secretariat approves, if supplied.
    pub secretariat_note: Option<String>,
}

/// The authenticated identity taking the action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// What a successful action does to the reservation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ReservationStatus,
    /// Human-readable confirmation returned to the caller.
    pub message: &'static str,
    pub rejection_reason: Option<String>,
    pub secretariat_note: Option<String>,
    pub cancel_reason: Option<String>,
    /// Whether `forwarded_at` must be stamped (secretariat approval).
    pub forwarded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Authorization(String),
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Validates the requested time interval for a new reservation.
pub fn validate_time_range(starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> Result<(), WorkflowError> {
    if ends_at <= starts_at {
        return Err(WorkflowError::Validation(
            "the end time must be after the start time".to_owned(),
        ));
    }

    Ok(())
}

/// Decides what a workflow action does, without touching any state.
///
/// Input validation runs first, then the transition table is consulted with
/// the stored status, then the actor is checked against the matched rule. Any
/// failure leaves the reservation untouched because nothing has been decided
/// yet.
pub fn plan(
    current: ReservationStatus,
    action: WorkflowAction,
    actor: &Actor,
    requester_id: Uuid,
    payload: &ActionPayload,
) -> Result<Transition, WorkflowError> {
    let reason = non_empty(payload.reason.as_deref());

    if action == WorkflowAction::Reject && reason.is_none() {
        return Err(WorkflowError::Validation(
            "a non-empty reason is required to reject a reservation".to_owned(),
        ));
    }

    let rule = TRANSITIONS
        .iter()
        .find(|rule| rule.current == current && rule.action == action)
        .ok_or_else(|| {
            WorkflowError::Authorization(format!(
                "cannot {action} a reservation in status {current}"
            ))
        })?;

    match rule.requirement {
        Requirement::Role(required) if actor.role != required => {
            return Err(WorkflowError::Authorization(format!(
                "{action} from {current} requires the {required} role"
            )));
        }
        Requirement::OriginalRequester if actor.id != requester_id => {
            return Err(WorkflowError::Authorization(
                "only the original requester may cancel a reservation".to_owned(),
            ));
        }
        _ => {}
    }

    let forwarded = action == WorkflowAction::Approve
        && current == ReservationStatus::PendingSecretariat;

    let message = match (action, rule.next) {
        (WorkflowAction::Approve, ReservationStatus::PendingProducer) => {
            "Reservation approved and forwarded to producer"
        }
        (WorkflowAction::Approve, _) => "Reservation finally approved",
        (WorkflowAction::Reject, _) => "Reservation rejected",
        (WorkflowAction::Cancel, _) => "Reservation cancelled",
    };

    Ok(Transition {
        next: rule.next,
        message,
        rejection_reason: if action == WorkflowAction::Reject {
            reason.clone()
        } else {
            None
        },
        secretariat_note: if forwarded {
            non_empty(payload.secretariat_note.as_deref())
        } else {
            None
        },
        cancel_reason: if action == WorkflowAction::Cancel {
            reason
        } else {
            None
        },
        forwarded,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sea_orm::Iterable;
    use uuid::Uuid;

    use crate::{
        role::Role,
        status::ReservationStatus,
        workflow::{
            ActionPayload, Actor, WorkflowAction, WorkflowError, plan, validate_time_range,
        },
    };

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
        }
    }

    fn reason(text: &str) -> ActionPayload {
        ActionPayload {
            reason: Some(text.to_owned()),
            secretariat_note: None,
        }
    }

    #[test]
    fn test_secretariat_approval_forwards_to_producer() {
        let transition = plan(
            ReservationStatus::PendingSecretariat,
            WorkflowAction::Approve,
            &actor(Role::Secretariat),
            Uuid::new_v4(),
            &ActionPayload::default(),
        )
        .unwrap();

        assert_eq!(transition.next, ReservationStatus::PendingProducer);
        assert_eq!(
            transition.message,
            "Reservation approved and forwarded to producer"
        );
        assert!(transition.forwarded);
        assert_eq!(transition.rejection_reason, None);
        assert_eq!(transition.secretariat_note, None);
    }

    #[test]
    fn test_secretariat_note_stored_on_first_approval_only() {
        let payload = ActionPayload {
            reason: None,
            secretariat_note: Some("  projector reserved as well  ".to_owned()),
        };

        let transition = plan(
            ReservationStatus::PendingSecretariat,
            WorkflowAction::Approve,
            &actor(Role::Secretariat),
            Uuid::new_v4(),
            &payload,
        )
        .unwrap();
        assert_eq!(
            transition.secretariat_note.as_deref(),
            Some("projector reserved as well")
        );

        let transition = plan(
            ReservationStatus::PendingProducer,
            WorkflowAction::Approve,
            &actor(Role::EventProducer),
            Uuid::new_v4(),
            &payload,
        )
        .unwrap();
        assert_eq!(transition.secretariat_note, None);
        assert!(!transition.forwarded);
    }

    #[test]
    fn test_producer_approval_is_final() {
        let transition = plan(
            ReservationStatus::PendingProducer,
            WorkflowAction::Approve,
            &actor(Role::EventProducer),
            Uuid::new_v4(),
            &ActionPayload::default(),
        )
        .unwrap();

        assert_eq!(transition.next, ReservationStatus::Approved);
        assert_eq!(transition.message, "Reservation finally approved");
    }

    #[test]
    fn test_reject_requires_non_empty_reason() {
        for payload in [
            ActionPayload::default(),
            reason(""),
            reason("   \t "),
        ] {
            let result = plan(
                ReservationStatus::PendingSecretariat,
                WorkflowAction::Reject,
                &actor(Role::Secretariat),
                Uuid::new_v4(),
                &payload,
            );
            assert!(matches!(result, Err(WorkflowError::Validation(_))));
        }
    }

    #[test]
    fn test_missing_reason_fails_validation_before_authorization() {
        // Wrong role and no reason: the input problem is reported first.
        let result = plan(
            ReservationStatus::PendingSecretariat,
            WorkflowAction::Reject,
            &actor(Role::Requester),
            Uuid::new_v4(),
            &ActionPayload::default(),
        );
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_reject_stores_reason_verbatim() {
        let transition = plan(
            ReservationStatus::PendingProducer,
            WorkflowAction::Reject,
            &actor(Role::EventProducer),
            Uuid::new_v4(),
            &reason("Conflicts with exam schedule"),
        )
        .unwrap();

        assert_eq!(transition.next, ReservationStatus::Rejected);
        assert_eq!(transition.message, "Reservation rejected");
        assert_eq!(
            transition.rejection_reason.as_deref(),
            Some("Conflicts with exam schedule")
        );
        assert_eq!(transition.cancel_reason, None);
    }

    #[test]
    fn test_wrong_role_cannot_act() {
        // Producer acting while the secretariat stage is still pending.
        let result = plan(
            ReservationStatus::PendingSecretariat,
            WorkflowAction::Approve,
            &actor(Role::EventProducer),
            Uuid::new_v4(),
            &ActionPayload::default(),
        );
        assert!(matches!(result, Err(WorkflowError::Authorization(_))));

        // Secretariat acting past its stage.
        let result = plan(
            ReservationStatus::PendingProducer,
            WorkflowAction::Approve,
            &actor(Role::Secretariat),
            Uuid::new_v4(),
            &ActionPayload::default(),
        );
        assert!(matches!(result, Err(WorkflowError::Authorization(_))));
    }

    #[test]
    fn test_it_admin_triggers_no_transitions() {
        for status in [
            ReservationStatus::PendingSecretariat,
            ReservationStatus::PendingProducer,
        ] {
            for action in [WorkflowAction::Approve, WorkflowAction::Reject] {
                let result = plan(
                    status,
                    action,
                    &actor(Role::ItAdmin),
                    Uuid::new_v4(),
                    &reason("because"),
                );
                assert!(matches!(result, Err(WorkflowError::Authorization(_))));
            }
        }
    }

    #[test]
    fn test_requester_may_cancel_own_pending_reservation() {
        let requester = actor(Role::Requester);

        for status in [
            ReservationStatus::PendingSecretariat,
            ReservationStatus::PendingProducer,
        ] {
            let transition = plan(
                status,
                WorkflowAction::Cancel,
                &requester,
                requester.id,
                &ActionPayload::default(),
            )
            .unwrap();
            assert_eq!(transition.next, ReservationStatus::Cancelled);
            assert_eq!(transition.message, "Reservation cancelled");
            assert_eq!(transition.cancel_reason, None);
        }
    }

    #[test]
    fn test_cancel_reason_is_optional_and_kept() {
        let requester = actor(Role::Requester);

        let transition = plan(
            ReservationStatus::PendingSecretariat,
            WorkflowAction::Cancel,
            &requester,
            requester.id,
            &reason("schedule changed"),
        )
        .unwrap();

        assert_eq!(transition.cancel_reason.as_deref(), Some("schedule changed"));
        assert_eq!(transition.rejection_reason, None);
    }

    #[test]
    fn test_only_the_original_requester_may_cancel() {
        let result = plan(
            ReservationStatus::PendingSecretariat,
            WorkflowAction::Cancel,
            &actor(Role::Requester),
            Uuid::new_v4(),
            &ActionPayload::default(),
        );
        assert!(matches!(result, Err(WorkflowError::Authorization(_))));

        // Holding an approval role does not grant cancel either.
        let result = plan(
            ReservationStatus::PendingProducer,
            WorkflowAction::Cancel,
            &actor(Role::Secretariat),
            Uuid::new_v4(),
            &ActionPayload::default(),
        );
        assert!(matches!(result, Err(WorkflowError::Authorization(_))));
    }

    #[test]
    fn test_terminal_states_accept_no_action() {
        let requester = actor(Role::Requester);

        for status in ReservationStatus::iter().filter(ReservationStatus::is_terminal) {
            for (action, acting) in [
                (WorkflowAction::Approve, actor(Role::Secretariat)),
                (WorkflowAction::Approve, actor(Role::EventProducer)),
                (WorkflowAction::Reject, actor(Role::Secretariat)),
                (WorkflowAction::Cancel, requester),
            ] {
                let result = plan(status, action, &acting, requester.id, &reason("late"));
                assert!(
                    matches!(result, Err(WorkflowError::Authorization(_))),
                    "{action} from {status} should not be possible"
                );
            }
        }
    }

    #[test]
    fn test_two_stage_happy_path_then_producer_reject() {
        // Requester books, secretariat approves, producer rejects.
        let requester_id = Uuid::new_v4();

        let first = plan(
            ReservationStatus::PendingSecretariat,
            WorkflowAction::Approve,
            &actor(Role::Secretariat),
            requester_id,
            &ActionPayload::default(),
        )
        .unwrap();
        assert_eq!(first.next, ReservationStatus::PendingProducer);

        let second = plan(
            first.next,
            WorkflowAction::Reject,
            &actor(Role::EventProducer),
            requester_id,
            &reason("Conflicts with exam schedule"),
        )
        .unwrap();
        assert_eq!(second.next, ReservationStatus::Rejected);
        assert_eq!(
            second.rejection_reason.as_deref(),
            Some("Conflicts with exam schedule")
        );
    }

    #[test]
    fn test_time_range_validation() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        assert!(validate_time_range(start, end).is_ok());
        assert!(matches!(
            validate_time_range(start, start),
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            validate_time_range(end, start),
            Err(WorkflowError::Validation(_))
        ));
    }

    #[test]
    fn test_action_parsing() {
        use std::str::FromStr;

        assert_eq!(
            WorkflowAction::from_str("approve").unwrap(),
            WorkflowAction::Approve
        );
        assert_eq!(
            WorkflowAction::from_str("Reject").unwrap(),
            WorkflowAction::Reject
        );
        assert_eq!(
            WorkflowAction::from_str("cancel").unwrap(),
            WorkflowAction::Cancel
        );
        assert!(WorkflowAction::from_str("escalate").is_err());
    }
}
