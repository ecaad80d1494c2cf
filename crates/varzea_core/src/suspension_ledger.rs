//! Player suspension engine.
//!
//! Consumes caution/dismissal facts emitted by the report ledger, tracks
//! yellow-card accumulation per (player, championship) key, and answers
//! the eligibility queries that gate new match events.

use chrono::{DateTime, Utc};

use crate::actor::Actor;
use crate::config::DisciplineConfig;
use crate::discipline::DisciplineCore;
use crate::error::{DisciplineError, Result};
use crate::models::{
    CardType, ChampionshipId, Eligibility, MatchId, PlayerId, PlayerSuspension,
    SuspensionReason,
};
use crate::store::Tables;

impl DisciplineCore {
    /// Record one caution/dismissal fact for a player.
    ///
    /// Red cards create an active suspension immediately. Yellow cards
    /// advance the (player, scope) accumulation counter; crossing the
    /// configured threshold creates one suspension and resets the counter.
    /// Returns the created suspension, if any.
    pub fn record_disciplinary_fact(
        &self,
        player_id: PlayerId,
        championship_id: Option<ChampionshipId>,
        card_type: CardType,
        match_date: DateTime<Utc>,
    ) -> Result<Option<PlayerSuspension>> {
        let mut tables = self.store.write();
        Ok(record_fact_locked(
            &mut tables,
            &self.config,
            player_id,
            championship_id,
            None,
            card_type,
            match_date,
        ))
    }

    /// Administrator-entered suspension outside the card pipeline.
    pub fn create_manual_suspension(
        &self,
        player_id: PlayerId,
        championship_id: Option<ChampionshipId>,
        games_to_suspend: u8,
        notes: &str,
        actor: &Actor,
    ) -> Result<PlayerSuspension> {
        if !actor.is_admin() {
            return Err(DisciplineError::Forbidden(
                "only administrators may create manual suspensions".into(),
            ));
        }
        if games_to_suspend == 0 {
            return Err(DisciplineError::InvalidInput(
                "games_to_suspend must be at least 1".into(),
            ));
        }

        let mut suspension = PlayerSuspension::new(
            player_id,
            championship_id,
            SuspensionReason::Manual,
            games_to_suspend,
            Utc::now(),
        );
        suspension.notes = notes.to_string();

        let mut tables = self.store.write();
        log::info!(
            "manual suspension for player {} ({} games)",
            player_id,
            games_to_suspend
        );
        tables.suspensions.insert(suspension.id, suspension.clone());
        Ok(suspension)
    }

    /// Credit one served game to every active suspension of the player in
    /// scope whose start date is on or before `match_date`. Called by the
    /// external match-finalization flow for each player who actually
    /// played. Returns the updated suspensions.
    pub fn consume_game(
        &self,
        player_id: PlayerId,
        championship_id: Option<ChampionshipId>,
        match_date: DateTime<Utc>,
    ) -> Result<Vec<PlayerSuspension>> {
        let mut tables = self.store.write();
        let mut updated = Vec::new();

        for suspension in tables.suspensions.values_mut() {
            if suspension.player_id == player_id
                && suspension.championship_id == championship_id
                && suspension.is_active
                && suspension.start_date <= match_date
            {
                suspension.serve_game(match_date);
                if !suspension.is_active {
                    log::info!("suspension {} fully served", suspension.id);
                }
                updated.push(suspension.clone());
            }
        }
        Ok(updated)
    }

    /// Read-only eligibility gate for a championship scope (`None` =
    /// friendly) as of a match date.
    pub fn eligibility(
        &self,
        player_id: PlayerId,
        championship_id: Option<ChampionshipId>,
        as_of: DateTime<Utc>,
    ) -> Eligibility {
        let tables = self.store.read();
        match active_suspension(&tables, player_id, championship_id, as_of) {
            Some(suspension) => Eligibility::denied(suspension.clone()),
            None => Eligibility::allowed(),
        }
    }

    /// Suspension history of a player ordered by start date. `None`
    /// returns every scope.
    pub fn suspension_history(
        &self,
        player_id: PlayerId,
        championship_id: Option<ChampionshipId>,
    ) -> Vec<PlayerSuspension> {
        let tables = self.store.read();
        let mut history: Vec<_> = tables
            .suspensions
            .values()
            .filter(|s| s.player_id == player_id)
            .filter(|s| {
                championship_id.is_none() || s.championship_id == championship_id
            })
            .cloned()
            .collect();
        history.sort_by_key(|s| (s.start_date, s.id));
        history
    }
}

/// Core of `record_disciplinary_fact`, shared with the report ledger so
/// card recording and the resulting suspension commit under one guard.
/// The counter read-modify-write is atomic per key by construction.
pub(crate) fn record_fact_locked(
    tables: &mut Tables,
    config: &DisciplineConfig,
    player_id: PlayerId,
    championship_id: Option<ChampionshipId>,
    source_match_id: Option<MatchId>,
    card_type: CardType,
    match_date: DateTime<Utc>,
) -> Option<PlayerSuspension> {
    let mut suspension = match card_type {
        CardType::Red => PlayerSuspension::new(
            player_id,
            championship_id,
            SuspensionReason::RedCard,
            config.red_card_games,
            match_date,
        ),
        CardType::Yellow => {
            let counter = tables
                .yellow_counters
                .entry((player_id, championship_id))
                .or_insert(0);
            *counter += 1;
            if *counter < config.yellow_card_threshold {
                return None;
            }
            *counter = 0;

            let mut suspension = PlayerSuspension::new(
                player_id,
                championship_id,
                SuspensionReason::YellowAccumulation,
                config.yellow_card_games,
                match_date,
            );
            suspension.yellow_cards_accumulated = config.yellow_card_threshold;
            suspension
        }
    };
    suspension.source_match_id = source_match_id;

    log::info!(
        "suspension created for player {} ({:?}, {} games)",
        player_id,
        suspension.reason,
        suspension.games_to_suspend
    );
    tables.suspensions.insert(suspension.id, suspension.clone());
    Some(suspension)
}

/// First active suspension gating the player in scope at `as_of`.
pub(crate) fn active_suspension<'a>(
    tables: &'a Tables,
    player_id: PlayerId,
    championship_id: Option<ChampionshipId>,
    as_of: DateTime<Utc>,
) -> Option<&'a PlayerSuspension> {
    tables.suspensions.values().find(|s| {
        s.player_id == player_id
            && s.championship_id == championship_id
            && s.gates_match_at(as_of)
    })
}

/// Eligibility check used by the report ledger under its write guard.
/// A suspension never gates its own originating match: the dismissal
/// that produced it only restricts later rounds, and events inside that
/// report are governed by the chronology rule instead.
pub(crate) fn gate_eligibility(
    tables: &Tables,
    player_id: PlayerId,
    championship_id: Option<ChampionshipId>,
    match_id: MatchId,
    as_of: DateTime<Utc>,
) -> Result<()> {
    let gating = tables.suspensions.values().find(|s| {
        s.player_id == player_id
            && s.championship_id == championship_id
            && s.source_match_id != Some(match_id)
            && s.gates_match_at(as_of)
    });
    if let Some(suspension) = gating {
        log::debug!(
            "player {} gated by suspension {} (since {})",
            player_id,
            suspension.id,
            suspension.start_date
        );
        return Err(DisciplineError::EligibilityDenied(format!(
            "player {} has an active suspension since {}",
            player_id, suspension.start_date
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_red_card_suspends_immediately() {
        let core = DisciplineCore::new();
        let player = Uuid::new_v4();
        let champ = Some(Uuid::new_v4());
        let now = Utc::now();

        let suspension = core
            .record_disciplinary_fact(player, champ, CardType::Red, now)
            .unwrap()
            .expect("red card must suspend");

        assert_eq!(suspension.reason, SuspensionReason::RedCard);
        assert_eq!(suspension.games_to_suspend, 1);
        assert_eq!(suspension.games_served, 0);
        assert!(suspension.is_active);
        assert_eq!(suspension.start_date, now);
    }

    #[test]
    fn test_yellow_accumulation_threshold() {
        let core = DisciplineCore::new();
        let player = Uuid::new_v4();
        let champ = Some(Uuid::new_v4());
        let now = Utc::now();

        // Two cautions: counter advances, nothing created.
        for _ in 0..2 {
            let created = core
                .record_disciplinary_fact(player, champ, CardType::Yellow, now)
                .unwrap();
            assert!(created.is_none());
        }

        // Third caution crosses the threshold.
        let suspension = core
            .record_disciplinary_fact(player, champ, CardType::Yellow, now)
            .unwrap()
            .expect("threshold must suspend");
        assert_eq!(suspension.reason, SuspensionReason::YellowAccumulation);
        assert_eq!(suspension.yellow_cards_accumulated, 3);

        // Counter was reset: exactly one suspension, and the next caution
        // starts a fresh cycle.
        assert_eq!(core.suspension_history(player, None).len(), 1);
        let created = core
            .record_disciplinary_fact(player, champ, CardType::Yellow, now)
            .unwrap();
        assert!(created.is_none());
    }

    #[test]
    fn test_accumulation_is_scoped_per_championship() {
        let core = DisciplineCore::new();
        let player = Uuid::new_v4();
        let now = Utc::now();

        core.record_disciplinary_fact(player, Some(Uuid::new_v4()), CardType::Yellow, now)
            .unwrap();
        core.record_disciplinary_fact(player, Some(Uuid::new_v4()), CardType::Yellow, now)
            .unwrap();
        let created = core
            .record_disciplinary_fact(player, None, CardType::Yellow, now)
            .unwrap();

        // Three cautions across three scopes never cross any threshold.
        assert!(created.is_none());
        assert!(core.suspension_history(player, None).is_empty());
    }

    #[test]
    fn test_consume_game_flips_active_after_one_game() {
        let core = DisciplineCore::new();
        let player = Uuid::new_v4();
        let now = Utc::now();

        core.record_disciplinary_fact(player, None, CardType::Red, now).unwrap();

        let updated = core.consume_game(player, None, now + Duration::days(7)).unwrap();
        assert_eq!(updated.len(), 1);
        assert!(!updated[0].is_active);
        assert_eq!(updated[0].games_served, 1);
        assert!(updated[0].end_date.is_some());

        assert!(core.eligibility(player, None, now + Duration::days(8)).eligible);
    }

    #[test]
    fn test_consume_game_ignores_matches_before_start() {
        let core = DisciplineCore::new();
        let player = Uuid::new_v4();
        let now = Utc::now();

        core.record_disciplinary_fact(player, None, CardType::Red, now).unwrap();

        let updated = core.consume_game(player, None, now - Duration::days(1)).unwrap();
        assert!(updated.is_empty());
    }

    #[test]
    fn test_eligibility_gate_and_pre_start_exemption() {
        let core = DisciplineCore::new();
        let player = Uuid::new_v4();
        let champ = Some(Uuid::new_v4());
        let now = Utc::now();

        core.record_disciplinary_fact(player, champ, CardType::Red, now).unwrap();

        let gated = core.eligibility(player, champ, now + Duration::days(1));
        assert!(!gated.eligible);
        assert!(gated.suspension.is_some());

        // A match scheduled before the suspension started is exempt.
        assert!(core.eligibility(player, champ, now - Duration::days(1)).eligible);
        // Other scopes are unaffected.
        assert!(core.eligibility(player, None, now + Duration::days(1)).eligible);
    }

    #[test]
    fn test_manual_suspension_requires_admin() {
        let core = DisciplineCore::new();
        let player = Uuid::new_v4();

        let err = core
            .create_manual_suspension(player, None, 2, "fighting", &Actor::organizer(Uuid::new_v4()))
            .unwrap_err();
        assert!(matches!(err, DisciplineError::Forbidden(_)));

        let suspension = core
            .create_manual_suspension(player, None, 2, "fighting", &Actor::admin(Uuid::new_v4()))
            .unwrap();
        assert_eq!(suspension.reason, SuspensionReason::Manual);
        assert_eq!(suspension.notes, "fighting");
        assert_eq!(suspension.games_to_suspend, 2);
    }

    #[test]
    fn test_manual_suspension_rejects_zero_games() {
        let core = DisciplineCore::new();
        let err = core
            .create_manual_suspension(
                Uuid::new_v4(),
                None,
                0,
                "",
                &Actor::admin(Uuid::new_v4()),
            )
            .unwrap_err();
        assert!(matches!(err, DisciplineError::InvalidInput(_)));
    }

    #[test]
    fn test_history_is_ordered_and_filterable() {
        let core = DisciplineCore::new();
        let player = Uuid::new_v4();
        let champ = Uuid::new_v4();
        let now = Utc::now();

        core.record_disciplinary_fact(player, Some(champ), CardType::Red, now).unwrap();
        core.record_disciplinary_fact(player, None, CardType::Red, now - Duration::days(30))
            .unwrap();

        let all = core.suspension_history(player, None);
        assert_eq!(all.len(), 2);
        assert!(all[0].start_date < all[1].start_date);

        let scoped = core.suspension_history(player, Some(champ));
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].championship_id, Some(champ));
    }
}
