//! In-memory league tables.
//!
//! All tables live behind a single `RwLock`; holding the write guard for
//! the whole of a multi-step workflow is the transactional boundary that
//! keeps match, report and punishment rows in sync. The `*_by_match`
//! maps are the uniqueness indexes backing the one-report/one-punishment
//! constraints.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::models::{
    ChampionshipId, Fixture, MatchId, MatchReport, PlayerId, PlayerSuspension, Punishment,
};

/// Key of the yellow-card accumulation counter.
pub(crate) type CounterKey = (PlayerId, Option<ChampionshipId>);

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub fixtures: HashMap<MatchId, Fixture>,
    pub reports: HashMap<Uuid, MatchReport>,
    pub report_by_match: HashMap<MatchId, Uuid>,
    pub punishments: HashMap<Uuid, Punishment>,
    pub punishment_by_match: HashMap<MatchId, Uuid>,
    pub suspensions: HashMap<Uuid, PlayerSuspension>,
    pub yellow_counters: HashMap<CounterKey, u8>,
}

impl Tables {
    pub fn report_for_match(&self, match_id: MatchId) -> Option<&MatchReport> {
        self.report_by_match.get(&match_id).and_then(|id| self.reports.get(id))
    }

    pub fn insert_report(&mut self, report: MatchReport) {
        self.report_by_match.insert(report.match_id, report.id);
        self.reports.insert(report.id, report);
    }

    pub fn remove_report_for_match(&mut self, match_id: MatchId) -> Option<MatchReport> {
        let id = self.report_by_match.remove(&match_id)?;
        self.reports.remove(&id)
    }

    pub fn punishment_for_match(&self, match_id: MatchId) -> Option<&Punishment> {
        self.punishment_by_match.get(&match_id).and_then(|id| self.punishments.get(id))
    }

    pub fn punishment_for_match_mut(&mut self, match_id: MatchId) -> Option<&mut Punishment> {
        let id = *self.punishment_by_match.get(&match_id)?;
        self.punishments.get_mut(&id)
    }

    pub fn insert_punishment(&mut self, punishment: Punishment) {
        self.punishment_by_match.insert(punishment.match_id, punishment.id);
        self.punishments.insert(punishment.id, punishment);
    }

    pub fn remove_punishment_for_match(&mut self, match_id: MatchId) -> Option<Punishment> {
        let id = self.punishment_by_match.remove(&match_id)?;
        self.punishments.remove(&id)
    }
}

#[derive(Debug, Default)]
pub(crate) struct LeagueStore {
    state: RwLock<Tables>,
}

impl LeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: Tables) -> Self {
        Self { state: RwLock::new(tables) }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.state.read().unwrap()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.state.write().unwrap()
    }
}
