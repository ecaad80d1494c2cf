use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChampionshipId, MatchId, PlayerId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuspensionReason {
    YellowAccumulation,
    RedCard,
    Manual,
}

/// A served-by-games player ban.
///
/// Suspensions are immutable audit facts once created: removing the card
/// that produced one never revokes it. `games_served` advances only when
/// the external finalization flow reports a played game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSuspension {
    pub id: Uuid,
    pub player_id: PlayerId,
    /// `None` = friendly (non-championship) scope.
    pub championship_id: Option<ChampionshipId>,
    pub reason: SuspensionReason,
    /// Match whose report produced this suspension, if any. That match is
    /// exempt from the gate: a dismissal punishes later rounds, while
    /// events inside the originating report answer to the chronology rule.
    pub source_match_id: Option<MatchId>,
    pub yellow_cards_accumulated: u8,
    pub games_to_suspend: u8,
    pub games_served: u8,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: String,
}

impl PlayerSuspension {
    pub fn new(
        player_id: PlayerId,
        championship_id: Option<ChampionshipId>,
        reason: SuspensionReason,
        games_to_suspend: u8,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            championship_id,
            reason,
            source_match_id: None,
            yellow_cards_accumulated: 0,
            games_to_suspend,
            games_served: 0,
            is_active: true,
            start_date,
            end_date: None,
            notes: String::new(),
        }
    }

    /// Credit one served game; deactivates and stamps `end_date` once the
    /// quota is reached.
    pub(crate) fn serve_game(&mut self, on: DateTime<Utc>) {
        self.games_served = self.games_served.saturating_add(1);
        if self.games_served >= self.games_to_suspend {
            self.is_active = false;
            self.end_date = Some(on);
        }
    }

    /// Whether this suspension gates a match scheduled at `as_of`.
    /// Matches scheduled before the suspension started are exempt.
    pub fn gates_match_at(&self, as_of: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= as_of
    }
}

/// Read model returned by the eligibility gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Eligibility {
    pub eligible: bool,
    pub suspension: Option<PlayerSuspension>,
}

impl Eligibility {
    pub fn allowed() -> Self {
        Self { eligible: true, suspension: None }
    }

    pub fn denied(suspension: PlayerSuspension) -> Self {
        Self { eligible: false, suspension: Some(suspension) }
    }
}
