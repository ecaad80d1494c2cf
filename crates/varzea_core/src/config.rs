use serde::{Deserialize, Serialize};

/// Disciplinary tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisciplineConfig {
    /// Yellow cards in one scope that trigger an automatic suspension.
    pub yellow_card_threshold: u8,

    /// Games suspended on yellow-card accumulation.
    pub yellow_card_games: u8,

    /// Games suspended on a straight red card.
    pub red_card_games: u8,

    /// Goals credited to the non-punished side of a walkover.
    pub walkover_goals: u8,
}

impl Default for DisciplineConfig {
    fn default() -> Self {
        Self {
            yellow_card_threshold: 3,
            yellow_card_games: 1,
            red_card_games: 1,
            walkover_goals: 3,
        }
    }
}
