//! Persistent entities of the disciplinary core.

pub mod fixture;
pub mod punishment;
pub mod report;
pub mod suspension;

pub use fixture::{Fixture, MatchKind, MatchStatus};
pub use punishment::{Punishment, PunishmentReason, WalkoverRequest};
pub use report::{CardEvent, CardType, GoalEvent, MatchReport, MAX_MINUTE, MIN_MINUTE};
pub use suspension::{Eligibility, PlayerSuspension, SuspensionReason};

pub type MatchId = uuid::Uuid;
pub type TeamId = uuid::Uuid;
pub type PlayerId = uuid::Uuid;
pub type ChampionshipId = uuid::Uuid;
pub type UserId = uuid::Uuid;
