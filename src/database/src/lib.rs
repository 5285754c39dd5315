//! Persistence of [`league_core::league::LeagueState`] (spec §6
//! "Persistence layout": the season-level league state is the unit of
//! persistence, round-tripping `active_season_id`, `season_history`,
//! `games`, `player_stats`, `team_stats`, `game_results`,
//! `phase_containers`, `master_schedule`).
//!
//! Grounded on the teacher's `database` crate, which snapshots generated
//! club/player data as JSON; here the payload is the season-accumulated
//! `LeagueState` instead, and a `flate2` gzip layer is kept from the
//! teacher's own dependency set to keep a season's worth of per-player,
//! per-game history compact on disk. `include_dir` (the teacher's way of
//! bundling a directory of generated club data at compile time) is
//! dropped in favor of `include_str!` for the handful of embedded era
//! `GameConfig` JSON tables, since that set is small and fixed rather
//! than a directory of per-club files — the embedding itself already
//! lives in `league_core::config`.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use league_core::league::LeagueState;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("league snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("league snapshot (de)serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Serializes a [`LeagueState`] to gzip-compressed JSON bytes.
///
/// Mirrors the teacher's `database` crate writing generated club data as
/// JSON to disk, with a `flate2` gzip wrapper (also already a teacher
/// dependency) since a full season's `player_stats`/`game_results` map
/// is large and compresses well.
pub fn to_snapshot_bytes(league: &LeagueState) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(league)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

/// Inverse of [`to_snapshot_bytes`].
pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<LeagueState> {
    let mut decoder = GzDecoder::new(bytes);
    let mut json = Vec::new();
    decoder.read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}

/// Writes a league snapshot to `path`, creating parent directories if
/// needed (the teacher's generator/loader modules always write under a
/// fixed `data/` root; this mirrors that convenience without hardcoding
/// a path).
pub fn save_to_path(league: &LeagueState, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = to_snapshot_bytes(league)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Reads a league snapshot previously written by [`save_to_path`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<LeagueState> {
    let bytes = std::fs::read(path)?;
    from_snapshot_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_active_season_and_counts() {
        let mut league = LeagueState::new("2025-26");
        league.cache_version = 3;
        let bytes = to_snapshot_bytes(&league).expect("serialize");
        let restored = from_snapshot_bytes(&bytes).expect("deserialize");
        assert_eq!(restored.active_season_id, "2025-26");
        assert_eq!(restored.cache_version, 3);
        assert!(restored.games.is_empty());
    }

    #[test]
    fn save_and_load_path_round_trips() {
        let league = LeagueState::new("2025-26");
        let dir = std::env::temp_dir().join(format!("league_db_test_{}", std::process::id()));
        let file = dir.join("league.json.gz");
        save_to_path(&league, &file).expect("save");
        let restored = load_from_path(&file).expect("load");
        assert_eq!(restored.active_season_id, league.active_season_id);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
