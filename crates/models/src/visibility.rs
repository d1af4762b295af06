use uuid::Uuid;

use crate::role::Role;

/// Which reservations an actor may see. Resolved once, centrally, instead of
/// being re-derived per caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Every reservation, any status.
    All,
    /// Only reservations created by this user.
    OwnedBy(Uuid),
    /// Only reservations that have been forwarded past the secretariat stage.
    Forwarded,
}

/// The visibility rule for the read path.
///
/// Secretariat sees everything because every reservation enters the workflow
/// at `PendingSecretariat`; the producer sees a reservation only once the
/// secretariat has forwarded it.
pub fn scope_for(role: Role, user_id: Uuid) -> VisibilityScope {
    match role {
        Role::Requester => VisibilityScope::OwnedBy(user_id),
        Role::Secretariat => VisibilityScope::All,
        Role::EventProducer => VisibilityScope::Forwarded,
        Role::ItAdmin => VisibilityScope::All,
    }
}

impl VisibilityScope {
    /// Whether a reservation owned by `requester_id` falls inside this scope.
    /// `forwarded` is whether the secretariat has already approved it.
    pub fn permits(&self, requester_id: Uuid, forwarded: bool) -> bool {
        match self {
            Self::All => true,
            Self::OwnedBy(user_id) => *user_id == requester_id,
            Self::Forwarded => forwarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::{
        role::Role,
        visibility::{VisibilityScope, scope_for},
    };

    #[test]
    fn test_requester_sees_only_own_rows() {
        let requester = Uuid::new_v4();
        let someone_else = Uuid::new_v4();

        let scope = scope_for(Role::Requester, requester);
        assert_eq!(scope, VisibilityScope::OwnedBy(requester));
        assert!(scope.permits(requester, false));
        assert!(scope.permits(requester, true));
        assert!(!scope.permits(someone_else, true));
    }

    #[test]
    fn test_secretariat_and_it_admin_see_everything() {
        let user = Uuid::new_v4();

        for role in [Role::Secretariat, Role::ItAdmin] {
            let scope = scope_for(role, user);
            assert_eq!(scope, VisibilityScope::All);
            assert!(scope.permits(Uuid::new_v4(), false));
        }
    }

    #[test]
    fn test_producer_sees_only_forwarded_rows() {
        let scope = scope_for(Role::EventProducer, Uuid::new_v4());
        assert_eq!(scope, VisibilityScope::Forwarded);
        assert!(scope.permits(Uuid::new_v4(), true));
        assert!(!scope.permits(Uuid::new_v4(), false));
    }
}
