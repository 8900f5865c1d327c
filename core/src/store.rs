//! Finished-match history.
//!
//! [`MatchLog`] is the in-memory list; [`HistoryStore`] persists it as a JSON
//! array of [`MatchResult`] records in a single file.

use crate::MatchResult;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history io failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("history file {path} is not valid: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Stored oldest first; [`MatchLog::newest_first`] is the display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchLog {
    records: Vec<MatchResult>,
}

impl MatchLog {
    pub fn new(records: Vec<MatchResult>) -> Self {
        Self { records }
    }

    /// Append a finished match. Returns `false` when a record with the same
    /// id is already present.
    pub fn record(&mut self, result: MatchResult) -> bool {
        if self.contains(&result.id) {
            return false;
        }
        self.records.push(result);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &MatchResult> {
        self.records.iter().rev()
    }

    /// Index into [`MatchLog::newest_first`] order.
    pub fn get_newest(&self, index: usize) -> Option<&MatchResult> {
        self.newest_first().nth(index)
    }

    pub fn records(&self) -> &[MatchResult] {
        &self.records
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(HISTORY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<MatchLog, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(MatchLog::default()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(MatchLog::default());
        }
        let records = serde_json::from_str(&content).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        Ok(MatchLog::new(records))
    }

    pub fn try_save(&self, log: &MatchLog) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let payload =
            serde_json::to_string_pretty(log.records()).map_err(|source| StoreError::Format {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, payload).map_err(io_err)
    }

    /// Missing or unreadable history is an empty log.
    pub fn load(&self) -> MatchLog {
        match self.try_load() {
            Ok(log) => {
                info!("loaded {} matches from {}", log.len(), self.path.display());
                log
            }
            Err(e) => {
                warn!("{e}; starting with empty history");
                MatchLog::default()
            }
        }
    }

    /// Returns whether the write succeeded; failures are logged only.
    pub fn save(&self, log: &MatchLog) -> bool {
        match self.try_save(log) {
            Ok(()) => true,
            Err(e) => {
                error!("{e}");
                false
            }
        }
    }

    pub fn clear(&self, log: &mut MatchLog) -> bool {
        log.clear();
        self.save(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameMode, Player, ScoreSnapshot, TEAM_ONE, TEAM_TWO, Team};

    fn result(id: &str) -> MatchResult {
        let mut winner = Team::new(TEAM_ONE, vec![Player::new(0, "Ann")]);
        winner.score = 11;
        let loser = Team::new(TEAM_TWO, vec![Player::new(1, "Bo")]);
        MatchResult {
            id: id.to_string(),
            timestamp: id.to_string(),
            winner: winner.clone(),
            teams: vec![winner, loser],
            game_mode: GameMode::Singles,
            game_history: Vec::new(),
            score_history: vec![ScoreSnapshot::default()],
        }
    }

    #[test]
    fn record_refuses_duplicate_ids() {
        let mut log = MatchLog::default();
        assert!(log.record(result("a")));
        assert!(log.record(result("b")));
        assert!(!log.record(result("a")));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn newest_first_reverses_insertion_order() {
        let mut log = MatchLog::default();
        for id in ["a", "b", "c"] {
            log.record(result(id));
        }
        let ids: Vec<&str> = log.newest_first().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
        assert_eq!(log.get_newest(0).map(|r| r.id.as_str()), Some("c"));
        assert!(log.get_newest(3).is_none());
    }

    #[test]
    fn save_then_load_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::in_dir(&dir.path().join("nested"));
        let mut log = MatchLog::default();
        log.record(result("2025-06-01T09:30:00.000Z"));
        assert!(store.save(&log));
        assert_eq!(store.load(), log);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"gameMode\": \"SINGLES\""));
        assert!(raw.contains("\"scoreHistory\""));
    }

    #[test]
    fn missing_or_malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());
        assert!(store.load().is_empty());
        assert!(store.try_load().is_ok());

        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.try_load(), Err(StoreError::Format { .. })));
        assert!(store.load().is_empty());
    }

    #[test]
    fn clear_empties_file_and_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());
        let mut log = MatchLog::default();
        log.record(result("a"));
        store.save(&log);
        assert!(store.clear(&mut log));
        assert!(log.is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = HistoryStore::in_dir(&blocker);
        assert!(!store.save(&MatchLog::default()));
    }
}
