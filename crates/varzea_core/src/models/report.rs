use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MatchId, PlayerId, TeamId, UserId};

/// Earliest minute an event may be recorded at.
pub const MIN_MINUTE: u8 = 1;
/// Latest minute an event may be recorded at (extra time included).
pub const MAX_MINUTE: u8 = 120;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Yellow,
    Red,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalEvent {
    pub id: Uuid,
    pub player_id: PlayerId,
    /// Player's team at the time of the event.
    pub team_id: TeamId,
    pub minute: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardEvent {
    pub id: Uuid,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub card_type: CardType,
    pub minute: u8,
}

/// The sumula: authoritative scoresheet for one match.
///
/// The score is derived from goal events, except for walkover reports,
/// which carry a fixed administrative score and no events at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchReport {
    pub id: Uuid,
    pub match_id: MatchId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: u8,
    pub away_score: u8,
    pub is_walkover: bool,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub goals: Vec<GoalEvent>,
    pub cards: Vec<CardEvent>,
}

impl MatchReport {
    pub fn new(match_id: MatchId, home_team_id: TeamId, away_team_id: TeamId, author_id: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            home_team_id,
            away_team_id,
            home_score: 0,
            away_score: 0,
            is_walkover: false,
            author_id,
            created_at: Utc::now(),
            goals: Vec::new(),
            cards: Vec::new(),
        }
    }

    /// Walkover reports are synthesized exclusively by the punishment
    /// workflow, hence crate-private.
    pub(crate) fn walkover(
        match_id: MatchId,
        home_team_id: TeamId,
        away_team_id: TeamId,
        home_score: u8,
        away_score: u8,
        author_id: UserId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            home_team_id,
            away_team_id,
            home_score,
            away_score,
            is_walkover: true,
            author_id,
            created_at: Utc::now(),
            goals: Vec::new(),
            cards: Vec::new(),
        }
    }

    /// Goals scored by one side, saturating at `u8::MAX` rather than
    /// wrapping on absurdly long event lists.
    pub fn goals_for(&self, team_id: TeamId) -> u8 {
        let count = self.goals.iter().filter(|g| g.team_id == team_id).count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    /// Minute of the player's dismissal in this report, if any.
    pub fn red_card_minute(&self, player_id: PlayerId) -> Option<u8> {
        self.cards
            .iter()
            .find(|c| c.player_id == player_id && c.card_type == CardType::Red)
            .map(|c| c.minute)
    }

    pub fn has_red_card(&self, player_id: PlayerId) -> bool {
        self.red_card_minute(player_id).is_some()
    }

    /// Re-derive the score from goal events. No-op for walkover reports,
    /// whose score is administrative.
    pub(crate) fn recount(&mut self) {
        if self.is_walkover {
            return;
        }
        self.home_score = self.goals_for(self.home_team_id);
        self.away_score = self.goals_for(self.away_team_id);
    }
}
