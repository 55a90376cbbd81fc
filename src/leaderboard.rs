//! Best survival times
//!
//! The simulation only sees the [`LeaderboardStore`] trait. Hosts plug in a
//! JSON file (native), LocalStorage (wasm), or the in-memory store in tests.
//! Reads never fail: corrupt or missing data is an empty board.

use crate::error::StoreError;
use crate::sim::Timer;

/// Maximum number of times to keep
pub const MAX_LEADERBOARD_ENTRIES: usize = 3;

/// Key (LocalStorage) under which the board is persisted
pub const STORAGE_KEY: &str = "leaderboard";

/// Persistence boundary for the leaderboard
pub trait LeaderboardStore {
    /// Current board, longest time first. Never fails.
    fn read(&self) -> Vec<Timer>;

    /// Replace the persisted board
    fn write(&mut self, entries: &[Timer]) -> Result<(), StoreError>;
}

/// Check if a run time would make the board
pub fn qualifies(board: &[Timer], time: Timer) -> bool {
    if board.len() < MAX_LEADERBOARD_ENTRIES {
        return true;
    }
    board.last().map(|last| time > *last).unwrap_or(true)
}

/// Get the rank a time would achieve (1-indexed, None if it doesn't qualify)
pub fn potential_rank(board: &[Timer], time: Timer) -> Option<usize> {
    if !qualifies(board, time) {
        return None;
    }
    let pos = board.iter().position(|t| time > *t);
    Some(pos.unwrap_or(board.len()) + 1)
}

/// Board with `time` inserted, longest first, trimmed to size
pub fn record(board: &[Timer], time: Timer) -> Vec<Timer> {
    let mut entries = board.to_vec();
    entries.push(time);
    normalize(entries)
}

/// Sort longest first and trim
pub fn normalize(mut entries: Vec<Timer>) -> Vec<Timer> {
    entries.sort_by(|a, b| b.cmp(a));
    entries.truncate(MAX_LEADERBOARD_ENTRIES);
    entries
}

/// Decode a persisted board, keeping every well-formed entry
///
/// Anything that is not a JSON array yields an empty board; malformed
/// entries inside the array are skipped.
pub fn parse(json: &str) -> Vec<Timer> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(json) {
        Ok(values) => values,
        Err(err) => {
            log::warn!("Ignoring unreadable leaderboard: {}", err);
            return Vec::new();
        }
    };
    let entries = values
        .into_iter()
        .filter_map(|v| serde_json::from_value::<Timer>(v).ok())
        .collect();
    normalize(entries)
}

/// Volatile store, for tests and sessions without persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<Timer>,
    /// Make every write fail
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Timer>) -> Self {
        Self {
            entries: normalize(entries),
            fail_writes: false,
        }
    }
}

impl LeaderboardStore for MemoryStore {
    fn read(&self) -> Vec<Timer> {
        self.entries.clone()
    }

    fn write(&mut self, entries: &[Timer]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        self.entries = entries.to_vec();
        Ok(())
    }
}

/// JSON file on disk (native)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LeaderboardStore for FileStore {
    fn read(&self) -> Vec<Timer> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => {
                let entries = parse(&json);
                log::info!("Loaded {} leaderboard times", entries.len());
                entries
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No leaderboard found, starting fresh");
                Vec::new()
            }
            Err(err) => {
                log::warn!("Failed to read {}: {}", self.path.display(), err);
                Vec::new()
            }
        }
    }

    fn write(&mut self, entries: &[Timer]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        log::info!("Leaderboard saved ({} entries)", entries.len());
        Ok(())
    }
}

/// Browser LocalStorage under [`STORAGE_KEY`] (wasm)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl LeaderboardStore for LocalStorageStore {
    fn read(&self) -> Vec<Timer> {
        let Some(storage) = Self::storage() else {
            return Vec::new();
        };
        match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => {
                let entries = parse(&json);
                log::info!("Loaded {} leaderboard times", entries.len());
                entries
            }
            _ => {
                log::info!("No leaderboard found, starting fresh");
                Vec::new()
            }
        }
    }

    fn write(&mut self, entries: &[Timer]) -> Result<(), StoreError> {
        let storage = Self::storage()
            .ok_or_else(|| StoreError::Unavailable("no LocalStorage".to_string()))?;
        let json = serde_json::to_string(entries)?;
        storage
            .set_item(STORAGE_KEY, &json)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
        log::info!("Leaderboard saved ({} entries)", entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(minutes: u32, seconds: u32) -> Timer {
        Timer { minutes, seconds }
    }

    #[test]
    fn test_record_sorts_longest_first_and_caps() {
        let board = vec![t(2, 0), t(0, 30)];
        let board = record(&board, t(1, 15));
        assert_eq!(board, vec![t(2, 0), t(1, 15), t(0, 30)]);

        let board = record(&board, t(0, 10));
        assert_eq!(board.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(board.last(), Some(&t(0, 30)));

        let board = record(&board, t(5, 0));
        assert_eq!(board, vec![t(5, 0), t(2, 0), t(1, 15)]);
    }

    #[test]
    fn test_potential_rank() {
        let board = vec![t(2, 0), t(1, 0), t(0, 30)];
        assert_eq!(potential_rank(&board, t(3, 0)), Some(1));
        assert_eq!(potential_rank(&board, t(0, 45)), Some(3));
        assert_eq!(potential_rank(&board, t(0, 10)), None);
        assert_eq!(potential_rank(&[], t(0, 0)), Some(1));
    }

    #[test]
    fn test_parse_recovers_from_garbage() {
        assert!(parse("not json").is_empty());
        assert!(parse(r#"{"minutes": 1}"#).is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let json = r#"[
            {"minutes": 0, "seconds": 42},
            {"minutes": "x", "seconds": 1},
            null,
            {"minutes": 3, "seconds": 5}
        ]"#;
        assert_eq!(parse(json), vec![t(3, 5), t(0, 42)]);
    }

    #[test]
    fn test_memory_store_roundtrip_and_failure() {
        let mut store = MemoryStore::new();
        store.write(&[t(1, 0)]).unwrap();
        assert_eq!(store.read(), vec![t(1, 0)]);

        store.fail_writes = true;
        assert!(store.write(&[t(2, 0)]).is_err());
        assert_eq!(store.read(), vec![t(1, 0)]);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        let mut store = FileStore::new(&path);
        assert!(store.read().is_empty());

        store.write(&[t(4, 2), t(0, 9)]).unwrap();
        assert_eq!(FileStore::new(&path).read(), vec![t(4, 2), t(0, 9)]);

        std::fs::write(&path, "{corrupt").unwrap();
        assert!(FileStore::new(&path).read().is_empty());
    }

    #[test]
    fn test_file_store_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("missing").join("leaderboard.json"));
        assert!(matches!(store.write(&[t(0, 1)]), Err(StoreError::Io(_))));
    }
}
