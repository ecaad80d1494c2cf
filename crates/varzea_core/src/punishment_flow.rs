//! Walkover punishment workflow.
//!
//! Applying a punishment synthesizes an event-less 3-0 report against the
//! punished side, records the punishment and finalizes the match, all
//! under one write guard: a failed step leaves no partial record, and a
//! re-driven call after a crash lands on the `Conflict` checks instead of
//! double-applying.

use crate::actor::Actor;
use crate::discipline::DisciplineCore;
use crate::error::{DisciplineError, Result};
use crate::models::{
    MatchId, MatchReport, MatchStatus, Punishment, PunishmentReason, TeamId, WalkoverRequest,
};
use crate::roster::RosterProvider;
use crate::state_machine::set_status_locked;
use chrono::Utc;
use uuid::Uuid;

impl DisciplineCore {
    /// Apply a disciplinary forfeiture to a match.
    pub fn apply_punishment(
        &self,
        request: &WalkoverRequest,
        actor: &Actor,
        roster: &dyn RosterProvider,
    ) -> Result<Punishment> {
        let match_id = request.match_id;

        if request.home_team_id == request.away_team_id {
            return Err(DisciplineError::InvalidInput(
                "home and away team must differ".into(),
            ));
        }
        if request.punished_team_id != request.home_team_id
            && request.punished_team_id != request.away_team_id
        {
            return Err(DisciplineError::InvalidInput(format!(
                "punished team {} is not a scheduled side",
                request.punished_team_id
            )));
        }

        let mut tables = self.store.write();
        let fixture = tables
            .fixtures
            .get(&match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("match {}", match_id)))?;
        if !actor.can_manage(fixture) {
            return Err(DisciplineError::Forbidden(format!(
                "user {} may not punish match {}",
                actor.user_id, match_id
            )));
        }
        if !matches!(fixture.status, MatchStatus::Open | MatchStatus::Confirmed) {
            return Err(DisciplineError::InvalidState(format!(
                "match {} is {:?} and cannot be forfeited",
                match_id, fixture.status
            )));
        }
        if roster.enrolled_teams(match_id).len() < 2 {
            return Err(DisciplineError::InvalidState(format!(
                "match {} does not have two enrolled teams",
                match_id
            )));
        }
        if tables.punishment_for_match(match_id).is_some() {
            return Err(DisciplineError::Conflict(format!(
                "match {} is already punished",
                match_id
            )));
        }
        // A punishment never layers onto a manually scored match; the
        // operator deletes the existing report first.
        if tables.report_for_match(match_id).is_some() {
            return Err(DisciplineError::Conflict(format!(
                "match {} already has a report",
                match_id
            )));
        }

        // Punished side scores 0, the other side takes the walkover goals.
        let (home_score, away_score) = if request.punished_team_id == request.home_team_id {
            (0, self.config.walkover_goals)
        } else {
            (self.config.walkover_goals, 0)
        };

        let report = MatchReport::walkover(
            match_id,
            request.home_team_id,
            request.away_team_id,
            home_score,
            away_score,
            actor.user_id,
        );
        tables.insert_report(report);

        let punishment = Punishment {
            id: Uuid::new_v4(),
            match_id,
            punished_team_id: request.punished_team_id,
            reason: request.reason,
            home_team_id: request.home_team_id,
            away_team_id: request.away_team_id,
            created_by: actor.user_id,
            created_at: Utc::now(),
        };
        tables.insert_punishment(punishment.clone());

        set_status_locked(&mut tables, match_id, MatchStatus::Finalized)?;
        log::info!(
            "walkover applied to match {}: team {} punished ({:?})",
            match_id,
            request.punished_team_id,
            request.reason
        );
        Ok(punishment)
    }

    /// Reverse a punishment: the walkover report goes away and the match
    /// returns to `Confirmed` (teams had already joined; never `Open`).
    pub fn remove_punishment(&self, match_id: MatchId, actor: &Actor) -> Result<()> {
        let mut tables = self.store.write();
        let fixture = tables
            .fixtures
            .get(&match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("match {}", match_id)))?;
        if !actor.can_manage(fixture) {
            return Err(DisciplineError::Forbidden(format!(
                "user {} may not unpunish match {}",
                actor.user_id, match_id
            )));
        }
        if tables.punishment_for_match(match_id).is_none() {
            return Err(DisciplineError::NotFound(format!(
                "punishment for match {}",
                match_id
            )));
        }

        tables.remove_report_for_match(match_id);
        tables.remove_punishment_for_match(match_id);
        set_status_locked(&mut tables, match_id, MatchStatus::Confirmed)?;
        log::info!("walkover removed from match {}", match_id);
        Ok(())
    }

    /// Amend the punished team and/or reason in place. The synthesized
    /// report score is intentionally left alone; an operator who wants it
    /// re-derived removes and re-applies the punishment.
    pub fn update_punishment(
        &self,
        match_id: MatchId,
        new_team: Option<TeamId>,
        new_reason: Option<PunishmentReason>,
        actor: &Actor,
    ) -> Result<Punishment> {
        let mut tables = self.store.write();
        let fixture = tables
            .fixtures
            .get(&match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("match {}", match_id)))?;
        if !actor.can_manage(fixture) {
            return Err(DisciplineError::Forbidden(format!(
                "user {} may not amend the punishment of match {}",
                actor.user_id, match_id
            )));
        }

        let punishment = tables
            .punishment_for_match_mut(match_id)
            .ok_or_else(|| DisciplineError::NotFound(format!("punishment for match {}", match_id)))?;

        if let Some(team) = new_team {
            if team != punishment.home_team_id && team != punishment.away_team_id {
                return Err(DisciplineError::InvalidInput(format!(
                    "team {} is not a scheduled side of match {}",
                    team, match_id
                )));
            }
            punishment.punished_team_id = team;
        }
        if let Some(reason) = new_reason {
            punishment.reason = reason;
        }

        let updated = punishment.clone();
        log::info!("punishment of match {} amended", match_id);
        Ok(updated)
    }

    pub fn punishment_for_match(&self, match_id: MatchId) -> Result<Punishment> {
        self.store
            .read()
            .punishment_for_match(match_id)
            .cloned()
            .ok_or_else(|| {
                DisciplineError::NotFound(format!("punishment for match {}", match_id))
            })
    }
}
