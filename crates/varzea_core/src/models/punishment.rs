use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MatchId, TeamId, UserId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PunishmentReason {
    Withdrawal,
    NoShow,
    LateArrival,
    InsufficientPlayers,
}

/// Disciplinary forfeiture of one match. At most one per match.
///
/// Both scheduled sides are kept even though one forfeits: they are
/// needed to synthesize (and later re-synthesize) the walkover report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Punishment {
    pub id: Uuid,
    pub match_id: MatchId,
    pub punished_team_id: TeamId,
    pub reason: PunishmentReason,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Input for [`crate::DisciplineCore::apply_punishment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalkoverRequest {
    pub match_id: MatchId,
    pub punished_team_id: TeamId,
    pub reason: PunishmentReason,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
}
