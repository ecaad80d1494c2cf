//! # varzea_core - Disciplinary core for recreational football leagues
//!
//! This library implements the disciplinary subsystem of a recreational
//! football league: the match lifecycle state machine, the walkover (WO)
//! punishment workflow, the match report ledger (goals and cards) and the
//! player suspension engine that consumes that ledger.
//!
//! ## Features
//! - Match lifecycle transitions gated by organizer/admin authorization
//! - Walkover punishments that synthesize a 3-0 report and can be reversed
//! - Score derived from goal events, with red-card chronology enforcement
//! - Yellow-card accumulation and red-card suspensions, per championship
//! - Eligibility gate blocking suspended players from new match events
//! - Compressed, checksummed league snapshots for persistence
//!
//! Identity/session, team rosters and match scheduling live outside the
//! core and are consumed through the [`Actor`] and [`RosterProvider`]
//! seams.

pub mod actor;
pub mod config;
pub mod discipline;
pub mod error;
pub mod models;
pub mod punishment_flow;
pub mod report_ledger;
pub mod roster;
pub mod snapshot;
pub mod state_machine;
mod store;
pub mod suspension_ledger;

pub use actor::{Actor, Role};
pub use config::DisciplineConfig;
pub use discipline::DisciplineCore;
pub use error::{DisciplineError, Result};
pub use models::{
    CardEvent, CardType, Eligibility, Fixture, GoalEvent, MatchKind, MatchReport, MatchStatus,
    PlayerSuspension, Punishment, PunishmentReason, SuspensionReason, WalkoverRequest,
};
pub use roster::{RosterProvider, StaticRoster};
pub use snapshot::{LeagueSnapshot, SnapshotError, SNAPSHOT_VERSION};
