//! Match lifecycle state machine.
//!
//! The public table is `Open -> Confirmed -> Finalized` plus
//! `Open|Confirmed -> CancelledByWo`. The reversal edges back to
//! `Confirmed` exist only on the punishment-removal path and go through
//! the crate-private [`set_status_locked`], never through [`transition`].

use crate::actor::Actor;
use crate::discipline::DisciplineCore;
use crate::error::{DisciplineError, Result};
use crate::models::{MatchId, MatchStatus};
use crate::store::Tables;

impl DisciplineCore {
    /// Move a match to `target`. Side-effect free beyond the status write:
    /// callers decide what else happens around a transition.
    pub fn transition(
        &self,
        match_id: MatchId,
        target: MatchStatus,
        actor: &Actor,
    ) -> Result<MatchStatus> {
        let mut tables = self.store.write();
        let fixture = tables
            .fixtures
            .get_mut(&match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("match {}", match_id)))?;

        if !actor.can_manage(fixture) {
            return Err(DisciplineError::Forbidden(format!(
                "user {} may not transition match {}",
                actor.user_id, match_id
            )));
        }
        if !fixture.status.can_transition(target) {
            return Err(DisciplineError::InvalidTransition { from: fixture.status, to: target });
        }

        fixture.status = target;
        log::info!("match {} -> {:?}", match_id, target);
        Ok(target)
    }
}

/// Privileged status write used by the punishment workflow, which may
/// finalize on apply and reverse out of `Finalized`/`CancelledByWo` on
/// removal. Must run under the caller's write guard.
pub(crate) fn set_status_locked(
    tables: &mut Tables,
    match_id: MatchId,
    target: MatchStatus,
) -> Result<MatchStatus> {
    let fixture = tables
        .fixtures
        .get_mut(&match_id)
        .ok_or_else(|| DisciplineError::NotFound(format!("match {}", match_id)))?;
    fixture.status = target;
    log::info!("match {} -> {:?} (walkover workflow)", match_id, target);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Fixture;
    use chrono::Utc;
    use uuid::Uuid;

    fn core_with_fixture() -> (DisciplineCore, MatchId, Actor) {
        let core = DisciplineCore::new();
        let organizer = Uuid::new_v4();
        let fixture = Fixture::friendly(Utc::now(), organizer);
        let match_id = fixture.id;
        core.register_fixture(fixture).unwrap();
        (core, match_id, Actor::organizer(organizer))
    }

    #[test]
    fn test_full_forward_path() {
        let (core, match_id, organizer) = core_with_fixture();

        assert_eq!(
            core.transition(match_id, MatchStatus::Confirmed, &organizer).unwrap(),
            MatchStatus::Confirmed
        );
        assert_eq!(
            core.transition(match_id, MatchStatus::Finalized, &organizer).unwrap(),
            MatchStatus::Finalized
        );
        assert_eq!(core.fixture(match_id).unwrap().status, MatchStatus::Finalized);
    }

    #[test]
    fn test_skipping_confirmed_is_rejected() {
        let (core, match_id, organizer) = core_with_fixture();

        let err = core.transition(match_id, MatchStatus::Finalized, &organizer).unwrap_err();
        assert!(matches!(
            err,
            DisciplineError::InvalidTransition {
                from: MatchStatus::Open,
                to: MatchStatus::Finalized
            }
        ));
    }

    #[test]
    fn test_no_public_edge_leaves_finalized() {
        let (core, match_id, organizer) = core_with_fixture();
        core.transition(match_id, MatchStatus::Confirmed, &organizer).unwrap();
        core.transition(match_id, MatchStatus::Finalized, &organizer).unwrap();

        for target in [MatchStatus::Open, MatchStatus::Confirmed, MatchStatus::CancelledByWo] {
            assert!(matches!(
                core.transition(match_id, target, &organizer),
                Err(DisciplineError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_cancellation_edges() {
        let (core, match_id, organizer) = core_with_fixture();
        core.transition(match_id, MatchStatus::CancelledByWo, &organizer).unwrap();

        // Reversal is not a public edge.
        assert!(matches!(
            core.transition(match_id, MatchStatus::Confirmed, &organizer),
            Err(DisciplineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_non_organizer_is_forbidden() {
        let (core, match_id, _) = core_with_fixture();

        let stranger = Actor::user(Uuid::new_v4());
        assert!(matches!(
            core.transition(match_id, MatchStatus::Confirmed, &stranger),
            Err(DisciplineError::Forbidden(_))
        ));

        // An admin who is not the organizer may transition.
        let admin = Actor::admin(Uuid::new_v4());
        core.transition(match_id, MatchStatus::Confirmed, &admin).unwrap();
    }

    #[test]
    fn test_unknown_match_is_not_found() {
        let (core, _, organizer) = core_with_fixture();
        assert!(matches!(
            core.transition(Uuid::new_v4(), MatchStatus::Confirmed, &organizer),
            Err(DisciplineError::NotFound(_))
        ));
    }
}
