//! Match report ledger.
//!
//! One authoritative report per match: a score plus the ordered goal and
//! card events it is derived from. Card events push caution/dismissal
//! facts into the suspension ledger under the same write guard, so a
//! card and its suspension commit together.

use uuid::Uuid;

use crate::actor::Actor;
use crate::discipline::DisciplineCore;
use crate::error::{DisciplineError, Result};
use crate::models::{
    CardEvent, CardType, GoalEvent, MatchId, MatchReport, PlayerId, TeamId, MAX_MINUTE,
    MIN_MINUTE,
};
use crate::roster::RosterProvider;
use crate::suspension_ledger;

fn validate_minute(minute: u8) -> Result<()> {
    if !(MIN_MINUTE..=MAX_MINUTE).contains(&minute) {
        return Err(DisciplineError::InvalidInput(format!(
            "minute {} out of range {}..={}",
            minute, MIN_MINUTE, MAX_MINUTE
        )));
    }
    Ok(())
}

impl DisciplineCore {
    /// Open the scoresheet for a match. Score starts 0-0.
    pub fn create_report(
        &self,
        match_id: MatchId,
        home_team_id: TeamId,
        away_team_id: TeamId,
        actor: &Actor,
    ) -> Result<MatchReport> {
        if home_team_id == away_team_id {
            return Err(DisciplineError::InvalidInput(
                "home and away team must differ".into(),
            ));
        }

        let mut tables = self.store.write();
        if !tables.fixtures.contains_key(&match_id) {
            return Err(DisciplineError::NotFound(format!("match {}", match_id)));
        }
        if tables.report_for_match(match_id).is_some() {
            return Err(DisciplineError::Conflict(format!(
                "match {} already has a report",
                match_id
            )));
        }

        let report = MatchReport::new(match_id, home_team_id, away_team_id, actor.user_id);
        log::info!("report {} opened for match {}", report.id, match_id);
        tables.insert_report(report.clone());
        Ok(report)
    }

    /// Append a goal and bump the scoring side.
    ///
    /// The scorer's team comes from the roster seam; eligibility is gated
    /// against the match's championship scope at the match date. A player
    /// already dismissed at minute M may not score at any minute >= M.
    pub fn record_goal(
        &self,
        report_id: Uuid,
        player_id: PlayerId,
        minute: u8,
        roster: &dyn RosterProvider,
    ) -> Result<GoalEvent> {
        validate_minute(minute)?;

        let mut tables = self.store.write();
        let report = tables
            .reports
            .get(&report_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("report {}", report_id)))?;
        if report.is_walkover {
            return Err(DisciplineError::InvalidState(
                "walkover reports carry no events".into(),
            ));
        }
        let match_id = report.match_id;
        let (home, away) = (report.home_team_id, report.away_team_id);
        if let Some(dismissed_at) = report.red_card_minute(player_id) {
            if minute >= dismissed_at {
                return Err(DisciplineError::InvalidState(format!(
                    "player {} was dismissed at minute {}",
                    player_id, dismissed_at
                )));
            }
        }

        let fixture = tables
            .fixtures
            .get(&match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("match {}", match_id)))?;
        let scope = fixture.scope();
        let match_date = fixture.scheduled_at;

        let team_id = roster
            .player_team(player_id, match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("team of player {}", player_id)))?;
        if team_id != home && team_id != away {
            return Err(DisciplineError::InvalidInput(format!(
                "team {} is not part of match {}",
                team_id, match_id
            )));
        }

        suspension_ledger::gate_eligibility(&tables, player_id, scope, match_id, match_date)?;

        let goal = GoalEvent { id: Uuid::new_v4(), player_id, team_id, minute };
        let report = tables.reports.get_mut(&report_id).unwrap();
        report.goals.push(goal.clone());
        report.recount();
        log::info!("goal for player {} at minute {} in report {}", player_id, minute, report_id);
        Ok(goal)
    }

    /// Append a card and push the matching disciplinary fact to the
    /// suspension ledger. Any card for a player already dismissed in this
    /// report is a conflict, not a new event.
    pub fn record_card(
        &self,
        report_id: Uuid,
        player_id: PlayerId,
        card_type: CardType,
        minute: u8,
        roster: &dyn RosterProvider,
    ) -> Result<CardEvent> {
        validate_minute(minute)?;

        let mut tables = self.store.write();
        let report = tables
            .reports
            .get(&report_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("report {}", report_id)))?;
        if report.is_walkover {
            return Err(DisciplineError::InvalidState(
                "walkover reports carry no events".into(),
            ));
        }
        if report.has_red_card(player_id) {
            return Err(DisciplineError::Conflict(format!(
                "player {} already holds a red card in report {}",
                player_id, report_id
            )));
        }
        let match_id = report.match_id;
        let (home, away) = (report.home_team_id, report.away_team_id);

        let fixture = tables
            .fixtures
            .get(&match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("match {}", match_id)))?;
        let scope = fixture.scope();
        let match_date = fixture.scheduled_at;

        let team_id = roster
            .player_team(player_id, match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("team of player {}", player_id)))?;
        if team_id != home && team_id != away {
            return Err(DisciplineError::InvalidInput(format!(
                "team {} is not part of match {}",
                team_id, match_id
            )));
        }

        suspension_ledger::gate_eligibility(&tables, player_id, scope, match_id, match_date)?;

        let card = CardEvent { id: Uuid::new_v4(), player_id, team_id, card_type, minute };
        tables.reports.get_mut(&report_id).unwrap().cards.push(card.clone());
        log::info!(
            "{:?} card for player {} at minute {} in report {}",
            card_type,
            player_id,
            minute,
            report_id
        );

        // Same guard: the card and its suspension commit as one unit.
        suspension_ledger::record_fact_locked(
            &mut tables,
            &self.config,
            player_id,
            scope,
            Some(match_id),
            card_type,
            match_date,
        );
        Ok(card)
    }

    /// Remove a goal and re-derive the score. Returns whether a row was
    /// removed; removing an absent id is not an error.
    pub fn remove_goal(&self, report_id: Uuid, goal_id: Uuid) -> Result<bool> {
        let mut tables = self.store.write();
        let report = tables
            .reports
            .get_mut(&report_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("report {}", report_id)))?;

        let before = report.goals.len();
        report.goals.retain(|g| g.id != goal_id);
        let removed = report.goals.len() < before;
        if removed {
            report.recount();
            log::info!("goal {} removed from report {}", goal_id, report_id);
        }
        Ok(removed)
    }

    /// Remove a card. A suspension already produced by the card is an
    /// immutable audit fact and stays in place.
    pub fn remove_card(&self, report_id: Uuid, card_id: Uuid) -> Result<bool> {
        let mut tables = self.store.write();
        let report = tables
            .reports
            .get_mut(&report_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("report {}", report_id)))?;

        let before = report.cards.len();
        report.cards.retain(|c| c.id != card_id);
        let removed = report.cards.len() < before;
        if removed {
            log::info!("card {} removed from report {}", card_id, report_id);
        }
        Ok(removed)
    }

    /// Delete a manually scored report. Walkover reports are deleted only
    /// through punishment removal, which keeps match status and report in
    /// sync on a single code path.
    pub fn delete_report(&self, report_id: Uuid) -> Result<()> {
        let mut tables = self.store.write();
        let report = tables
            .reports
            .get(&report_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("report {}", report_id)))?;
        if report.is_walkover {
            return Err(DisciplineError::InvalidState(
                "walkover reports are deleted through punishment removal".into(),
            ));
        }

        let match_id = report.match_id;
        tables.remove_report_for_match(match_id);
        log::info!("report {} deleted for match {}", report_id, match_id);
        Ok(())
    }

    pub fn report_for_match(&self, match_id: MatchId) -> Result<MatchReport> {
        self.store
            .read()
            .report_for_match(match_id)
            .cloned()
            .ok_or_else(|| DisciplineError::NotFound(format!("report for match {}", match_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Fixture;
    use crate::roster::StaticRoster;
    use chrono::{Duration, Utc};

    struct Setup {
        core: DisciplineCore,
        match_id: MatchId,
        report_id: Uuid,
        home: TeamId,
        away: TeamId,
        roster: StaticRoster,
        author: Actor,
    }

    fn setup() -> Setup {
        let core = DisciplineCore::new();
        let organizer = Uuid::new_v4();
        let fixture = Fixture::friendly(Utc::now(), organizer);
        let match_id = fixture.id;
        core.register_fixture(fixture).unwrap();

        let (home, away) = (Uuid::new_v4(), Uuid::new_v4());
        let mut roster = StaticRoster::new();
        roster.enroll(match_id, home);
        roster.enroll(match_id, away);

        let author = Actor::organizer(organizer);
        let report = core.create_report(match_id, home, away, &author).unwrap();

        Setup { core, match_id, report_id: report.id, home, away, roster, author }
    }

    fn add_player(roster: &mut StaticRoster, team: TeamId) -> PlayerId {
        let player = Uuid::new_v4();
        roster.assign_player(player, team);
        player
    }

    #[test]
    fn test_duplicate_report_is_a_conflict() {
        let s = setup();
        let err = s
            .core
            .create_report(s.match_id, s.home, s.away, &s.author)
            .unwrap_err();
        assert!(matches!(err, DisciplineError::Conflict(_)));
    }

    #[test]
    fn test_score_follows_goal_events() {
        let mut s = setup();
        let p1 = add_player(&mut s.roster, s.home);
        let p2 = add_player(&mut s.roster, s.away);

        s.core.record_goal(s.report_id, p1, 10, &s.roster).unwrap();
        s.core.record_goal(s.report_id, p1, 40, &s.roster).unwrap();
        s.core.record_goal(s.report_id, p2, 77, &s.roster).unwrap();

        let report = s.core.report_for_match(s.match_id).unwrap();
        assert_eq!(report.home_score, 2);
        assert_eq!(report.away_score, 1);
        assert_eq!(report.home_score, report.goals_for(report.home_team_id));
        assert_eq!(report.away_score, report.goals_for(report.away_team_id));
    }

    #[test]
    fn test_goal_minute_must_be_in_range() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.home);

        for minute in [0, 121] {
            assert!(matches!(
                s.core.record_goal(s.report_id, p, minute, &s.roster),
                Err(DisciplineError::InvalidInput(_))
            ));
        }
        s.core.record_goal(s.report_id, p, 120, &s.roster).unwrap();
    }

    #[test]
    fn test_unknown_player_is_not_found() {
        let s = setup();
        assert!(matches!(
            s.core.record_goal(s.report_id, Uuid::new_v4(), 10, &s.roster),
            Err(DisciplineError::NotFound(_))
        ));
    }

    #[test]
    fn test_player_from_foreign_team_is_rejected() {
        let mut s = setup();
        let outsider = add_player(&mut s.roster, Uuid::new_v4());
        assert!(matches!(
            s.core.record_goal(s.report_id, outsider, 10, &s.roster),
            Err(DisciplineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_goals_after_dismissal() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.home);

        s.core.record_goal(s.report_id, p, 10, &s.roster).unwrap();
        s.core.record_card(s.report_id, p, CardType::Red, 20, &s.roster).unwrap();

        // At or after the dismissal minute: rejected.
        assert!(matches!(
            s.core.record_goal(s.report_id, p, 25, &s.roster),
            Err(DisciplineError::InvalidState(_))
        ));
        assert!(matches!(
            s.core.record_goal(s.report_id, p, 20, &s.roster),
            Err(DisciplineError::InvalidState(_))
        ));

        // Before it: still recordable (late bookkeeping of an earlier goal).
        s.core.record_goal(s.report_id, p, 15, &s.roster).unwrap();

        let report = s.core.report_for_match(s.match_id).unwrap();
        assert_eq!(report.home_score, 2);
    }

    #[test]
    fn test_second_card_after_red_is_a_conflict() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.away);

        s.core.record_card(s.report_id, p, CardType::Red, 30, &s.roster).unwrap();

        for card in [CardType::Red, CardType::Yellow] {
            assert!(matches!(
                s.core.record_card(s.report_id, p, card, 40, &s.roster),
                Err(DisciplineError::Conflict(_))
            ));
        }

        let report = s.core.report_for_match(s.match_id).unwrap();
        assert_eq!(report.cards.len(), 1);
    }

    #[test]
    fn test_card_emits_suspension_fact() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.home);

        s.core.record_card(s.report_id, p, CardType::Red, 30, &s.roster).unwrap();

        let history = s.core.suspension_history(p, None);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason, crate::models::SuspensionReason::RedCard);
        assert_eq!(history[0].source_match_id, Some(s.match_id));
        // Friendly match: global scope.
        assert_eq!(history[0].championship_id, None);
    }

    #[test]
    fn test_dismissal_gates_later_matches_but_not_its_own_report() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.home);

        s.core.record_card(s.report_id, p, CardType::Red, 20, &s.roster).unwrap();

        // Within the originating report only the chronology rule applies:
        // an earlier goal is still recordable despite the fresh suspension.
        s.core.record_goal(s.report_id, p, 15, &s.roster).unwrap();

        // The next round is gated by that same suspension.
        let next = Fixture::friendly(Utc::now() + Duration::days(7), Uuid::new_v4());
        let next_id = next.id;
        s.core.register_fixture(next).unwrap();
        s.roster.enroll(next_id, s.home);
        s.roster.enroll(next_id, s.away);
        let report = s.core.create_report(next_id, s.home, s.away, &s.author).unwrap();
        assert!(matches!(
            s.core.record_goal(report.id, p, 10, &s.roster),
            Err(DisciplineError::EligibilityDenied(_))
        ));
    }

    #[test]
    fn test_suspended_player_is_gated() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.home);

        // Suspension started well before the match date.
        s.core
            .record_disciplinary_fact(p, None, CardType::Red, Utc::now() - Duration::days(7))
            .unwrap();

        assert!(matches!(
            s.core.record_goal(s.report_id, p, 10, &s.roster),
            Err(DisciplineError::EligibilityDenied(_))
        ));
        assert!(matches!(
            s.core.record_card(s.report_id, p, CardType::Yellow, 10, &s.roster),
            Err(DisciplineError::EligibilityDenied(_))
        ));
    }

    #[test]
    fn test_match_scheduled_before_suspension_is_exempt() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.home);

        // Suspension starts after this match was scheduled.
        s.core
            .record_disciplinary_fact(p, None, CardType::Red, Utc::now() + Duration::days(7))
            .unwrap();

        s.core.record_goal(s.report_id, p, 10, &s.roster).unwrap();
    }

    #[test]
    fn test_remove_goal_recounts_and_is_idempotent() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.home);

        let goal = s.core.record_goal(s.report_id, p, 10, &s.roster).unwrap();
        assert_eq!(s.core.report_for_match(s.match_id).unwrap().home_score, 1);

        assert!(s.core.remove_goal(s.report_id, goal.id).unwrap());
        assert_eq!(s.core.report_for_match(s.match_id).unwrap().home_score, 0);

        // Second removal finds nothing and stays silent.
        assert!(!s.core.remove_goal(s.report_id, goal.id).unwrap());
    }

    #[test]
    fn test_remove_card_keeps_suspension() {
        let mut s = setup();
        let p = add_player(&mut s.roster, s.home);

        let card = s.core.record_card(s.report_id, p, CardType::Red, 30, &s.roster).unwrap();
        assert!(s.core.remove_card(s.report_id, card.id).unwrap());

        // The suspension is an audit fact and survives the card.
        assert_eq!(s.core.suspension_history(p, None).len(), 1);
    }

    #[test]
    fn test_delete_report_frees_the_match() {
        let s = setup();
        s.core.delete_report(s.report_id).unwrap();
        assert!(matches!(
            s.core.report_for_match(s.match_id),
            Err(DisciplineError::NotFound(_))
        ));

        // The match can be scored again.
        s.core.create_report(s.match_id, s.home, s.away, &s.author).unwrap();
    }
}
