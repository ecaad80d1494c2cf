//! Seam to the external team/roster collaborator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{MatchId, PlayerId, TeamId};

/// Resolves roster facts the core does not own: which team a player
/// currently belongs to, and which teams are enrolled in a match.
///
/// Lookups are strict: an unresolvable player yields `None` and surfaces
/// as `NotFound` in the ledger, never a silent default.
pub trait RosterProvider {
    /// The player's current team in the context of `match_id`, if any.
    fn player_team(&self, player_id: PlayerId, match_id: MatchId) -> Option<TeamId>;

    /// Teams enrolled for `match_id`.
    fn enrolled_teams(&self, match_id: MatchId) -> Vec<TeamId>;
}

/// Fixed roster lookup backed by maps. Used by tests and the CLI; a real
/// deployment implements [`RosterProvider`] over the team service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticRoster {
    /// player -> team
    pub players: HashMap<PlayerId, TeamId>,
    /// match -> enrolled teams
    pub matches: HashMap<MatchId, Vec<TeamId>>,
}

impl StaticRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn assign_player(&mut self, player_id: PlayerId, team_id: TeamId) {
        self.players.insert(player_id, team_id);
    }

    pub fn enroll(&mut self, match_id: MatchId, team_id: TeamId) {
        self.matches.entry(match_id).or_default().push(team_id);
    }
}

impl RosterProvider for StaticRoster {
    fn player_team(&self, player_id: PlayerId, _match_id: MatchId) -> Option<TeamId> {
        self.players.get(&player_id).copied()
    }

    fn enrolled_teams(&self, match_id: MatchId) -> Vec<TeamId> {
        self.matches.get(&match_id).cloned().unwrap_or_default()
    }
}
