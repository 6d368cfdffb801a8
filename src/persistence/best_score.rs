//! Best score across sessions
//!
//! A single JSON record, `{ "bestScore": n }`. Reads and writes never fail
//! from the caller's point of view: problems are logged and the game keeps
//! going with a score of 0.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{PersistenceError, data_dir, read_json, write_json_atomic};

const FILE_NAME: &str = "bestscore.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct BestScoreRecord {
    #[serde(rename = "bestScore", alias = "BestScore", default)]
    best_score: u64,
}

#[derive(Debug, Clone)]
pub struct BestScoreStore {
    path: PathBuf,
}

impl BestScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `bestscore.json` in the per-user data directory
    pub fn default_location() -> Self {
        Self::new(data_dir().join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<u64, PersistenceError> {
        read_json::<BestScoreRecord>(&self.path).map(|record| record.best_score)
    }

    /// Stored best score, or 0 when missing or unreadable
    pub fn load(&self) -> u64 {
        match self.try_load() {
            Ok(score) => score,
            Err(e) if e.is_not_found() => 0,
            Err(e) => {
                log::debug!("Ignoring best score file: {e}");
                0
            }
        }
    }

    pub fn try_save(&self, score: u64) -> Result<(), PersistenceError> {
        write_json_atomic(&self.path, &BestScoreRecord { best_score: score })
    }

    /// Store `score`. Negative scores and write failures leave the file as is.
    pub fn save(&self, score: i64) {
        let Ok(score) = u64::try_from(score) else {
            log::debug!("Not saving negative best score {score}");
            return;
        };
        match self.try_save(score) {
            Ok(()) => log::info!("Best score saved: {score}"),
            Err(e) => log::debug!("Failed to save best score: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Unique file path per call, under the system temp dir
    fn temp_store() -> BestScoreStore {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "neon-drift-best-{}-{n}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        BestScoreStore::new(dir.join(FILE_NAME))
    }

    fn cleanup(store: &BestScoreStore) {
        if let Some(dir) = store.path().parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let store = temp_store();
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let store = temp_store();
        store.save(1234);
        assert_eq!(store.load(), 1234);

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"bestScore\""));
        cleanup(&store);
    }

    #[test]
    fn test_negative_save_keeps_previous() {
        let store = temp_store();
        store.save(77);
        store.save(-1);
        assert_eq!(store.load(), 77);
        cleanup(&store);
    }

    #[test]
    fn test_corrupt_file_loads_zero() {
        let store = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), 0);

        std::fs::write(store.path(), r#"{"bestScore": -4}"#).unwrap();
        assert_eq!(store.load(), 0);
        cleanup(&store);
    }

    #[test]
    fn test_legacy_field_name() {
        let store = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"BestScore": 42}"#).unwrap();
        assert_eq!(store.load(), 42);
        cleanup(&store);
    }

    #[test]
    fn test_missing_field_is_zero() {
        let store = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{}").unwrap();
        assert_eq!(store.load(), 0);
        cleanup(&store);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_save_load(score in 0i64..=i64::MAX) {
            let store = temp_store();
            store.save(score);
            prop_assert_eq!(store.load(), score as u64);
            cleanup(&store);
        }
    }
}
