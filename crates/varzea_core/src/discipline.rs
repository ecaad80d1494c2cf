//! The disciplinary core facade.
//!
//! [`DisciplineCore`] owns the league tables and exposes every public
//! operation: lifecycle transitions (`state_machine`), the report ledger
//! (`report_ledger`), the walkover workflow (`punishment_flow`) and the
//! suspension engine (`suspension_ledger`). Each operation runs
//! synchronously within one request and either commits or leaves no
//! partial record.

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::config::DisciplineConfig;
use crate::error::{DisciplineError, Result};
use crate::models::{Fixture, MatchId, MatchKind};
use crate::snapshot::{
    self, CautionCounter, LeagueSnapshot, SnapshotError, SNAPSHOT_VERSION,
};
use crate::store::{LeagueStore, Tables};

pub struct DisciplineCore {
    pub(crate) store: LeagueStore,
    pub(crate) config: DisciplineConfig,
}

impl Default for DisciplineCore {
    fn default() -> Self {
        Self::new()
    }
}

impl DisciplineCore {
    pub fn new() -> Self {
        Self::with_config(DisciplineConfig::default())
    }

    pub fn with_config(config: DisciplineConfig) -> Self {
        Self { store: LeagueStore::new(), config }
    }

    pub fn config(&self) -> &DisciplineConfig {
        &self.config
    }

    /// Register a match scheduled by the external scheduling flow.
    ///
    /// The core never creates matches on its own; it only governs their
    /// disciplinary lifecycle once registered.
    pub fn register_fixture(&self, fixture: Fixture) -> Result<()> {
        match (fixture.kind, fixture.championship_id) {
            (MatchKind::Championship, None) => {
                return Err(DisciplineError::InvalidInput(
                    "championship match without championship id".into(),
                ))
            }
            (MatchKind::Friendly, Some(_)) => {
                return Err(DisciplineError::InvalidInput(
                    "friendly match with championship id".into(),
                ))
            }
            _ => {}
        }
        if let (Some(home), Some(away)) = (fixture.home_team_id, fixture.away_team_id) {
            if home == away {
                return Err(DisciplineError::InvalidInput(
                    "home and away team must differ".into(),
                ));
            }
        }

        let mut tables = self.store.write();
        if tables.fixtures.contains_key(&fixture.id) {
            return Err(DisciplineError::Conflict(format!(
                "match {} is already registered",
                fixture.id
            )));
        }
        log::info!("match {} registered ({:?})", fixture.id, fixture.kind);
        tables.fixtures.insert(fixture.id, fixture);
        Ok(())
    }

    pub fn fixture(&self, match_id: MatchId) -> Result<Fixture> {
        self.store
            .read()
            .fixtures
            .get(&match_id)
            .cloned()
            .ok_or_else(|| DisciplineError::NotFound(format!("match {}", match_id)))
    }

    /// Export the whole league state as a snapshot. Rows are sorted so the
    /// byte output is stable for identical state.
    pub fn to_snapshot(&self) -> LeagueSnapshot {
        let tables = self.store.read();

        let mut fixtures: Vec<_> = tables.fixtures.values().cloned().collect();
        fixtures.sort_by_key(|f| f.id);
        let mut reports: Vec<_> = tables.reports.values().cloned().collect();
        reports.sort_by_key(|r| r.id);
        let mut punishments: Vec<_> = tables.punishments.values().cloned().collect();
        punishments.sort_by_key(|p| p.id);
        let mut suspensions: Vec<_> = tables.suspensions.values().cloned().collect();
        suspensions.sort_by_key(|s| (s.start_date, s.id));
        let mut yellow_counters: Vec<_> = tables
            .yellow_counters
            .iter()
            .map(|(&(player_id, championship_id), &count)| CautionCounter {
                player_id,
                championship_id,
                count,
            })
            .collect();
        yellow_counters.sort_by_key(|c| (c.player_id, c.championship_id));

        LeagueSnapshot {
            version: SNAPSHOT_VERSION,
            timestamp: snapshot::current_timestamp(),
            fixtures,
            reports,
            punishments,
            suspensions,
            yellow_counters,
        }
    }

    /// Rebuild a core from a snapshot, restoring the uniqueness indexes.
    pub fn from_snapshot(
        snapshot: LeagueSnapshot,
        config: DisciplineConfig,
    ) -> std::result::Result<Self, SnapshotError> {
        snapshot.validate()?;

        let mut tables = Tables::default();
        for fixture in snapshot.fixtures {
            tables.fixtures.insert(fixture.id, fixture);
        }
        for report in snapshot.reports {
            tables.insert_report(report);
        }
        for punishment in snapshot.punishments {
            tables.insert_punishment(punishment);
        }
        for suspension in snapshot.suspensions {
            tables.suspensions.insert(suspension.id, suspension);
        }
        for counter in snapshot.yellow_counters {
            tables
                .yellow_counters
                .insert((counter.player_id, counter.championship_id), counter.count);
        }

        Ok(Self { store: LeagueStore::with_tables(tables), config })
    }

    /// Write the league snapshot to disk (temp file + rename).
    pub fn save_to_path(&self, path: &Path) -> std::result::Result<(), SnapshotError> {
        let bytes = snapshot::serialize_and_compress(&self.to_snapshot())?;

        let tmp = path.with_extension("tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        rename(&tmp, path)?;

        log::info!("league snapshot saved to {}", path.display());
        Ok(())
    }

    pub fn load_from_path(
        path: &Path,
        config: DisciplineConfig,
    ) -> std::result::Result<Self, SnapshotError> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        let snapshot = snapshot::decompress_and_deserialize(&bytes)?;
        Self::from_snapshot(snapshot, config)
    }
}
