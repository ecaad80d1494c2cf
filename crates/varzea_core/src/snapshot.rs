//! League snapshot persistence.
//!
//! Snapshot bytes are MessagePack (named fields) compressed with LZ4
//! (size prepended) and terminated by a SHA-256 checksum. The version
//! field guards forward compatibility.

use std::collections::HashSet;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{
    ChampionshipId, Fixture, MatchReport, PlayerId, PlayerSuspension, Punishment,
};

pub const SNAPSHOT_VERSION: u32 = 1;

const CHECKSUM_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}

/// Serialized form of the yellow-card accumulation counter row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CautionCounter {
    pub player_id: PlayerId,
    pub championship_id: Option<ChampionshipId>,
    pub count: u8,
}

/// Full persistent state of the disciplinary core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    /// Snapshot format version.
    pub version: u32,

    /// Snapshot timestamp (unix milliseconds).
    pub timestamp: u64,

    pub fixtures: Vec<Fixture>,
    pub reports: Vec<MatchReport>,
    pub punishments: Vec<Punishment>,
    pub suspensions: Vec<PlayerSuspension>,
    pub yellow_counters: Vec<CautionCounter>,
}

impl LeagueSnapshot {
    /// Structural checks before write/restore: the per-match uniqueness
    /// constraints must hold in the serialized rows too.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut match_ids = HashSet::new();
        for fixture in &self.fixtures {
            if !match_ids.insert(fixture.id) {
                return Err(SnapshotError::Corrupted);
            }
        }

        let mut reported = HashSet::new();
        for report in &self.reports {
            if !reported.insert(report.match_id) {
                return Err(SnapshotError::Corrupted);
            }
            if report.is_walkover && (!report.goals.is_empty() || !report.cards.is_empty()) {
                return Err(SnapshotError::Corrupted);
            }
        }

        let mut punished = HashSet::new();
        for punishment in &self.punishments {
            if !punished.insert(punishment.match_id) {
                return Err(SnapshotError::Corrupted);
            }
        }

        let mut suspension_ids = HashSet::new();
        for suspension in &self.suspensions {
            if !suspension_ids.insert(suspension.id) {
                return Err(SnapshotError::Corrupted);
            }
        }

        let mut counter_keys = HashSet::new();
        for counter in &self.yellow_counters {
            if !counter_keys.insert((counter.player_id, counter.championship_id)) {
                return Err(SnapshotError::Corrupted);
            }
        }

        Ok(())
    }
}

/// Serialize and compress a league snapshot.
pub fn serialize_and_compress(snapshot: &LeagueSnapshot) -> Result<Vec<u8>, SnapshotError> {
    snapshot.validate()?;

    let msgpack = to_vec_named(snapshot).map_err(SnapshotError::Serialization)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

/// Decompress and deserialize a league snapshot.
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<LeagueSnapshot, SnapshotError> {
    // Minimum: size prefix + checksum.
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(SnapshotError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - CHECKSUM_LEN);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated = hasher.finalize();
    if &calculated[..] != checksum_bytes {
        return Err(SnapshotError::ChecksumMismatch);
    }

    let msgpack =
        decompress_size_prepended(payload).map_err(|_| SnapshotError::Decompression)?;
    let snapshot: LeagueSnapshot =
        from_slice(&msgpack).map_err(SnapshotError::Deserialization)?;

    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    snapshot.validate()?;
    Ok(snapshot)
}

pub fn current_timestamp() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
