//! Per-user persistence
//!
//! Small JSON documents under one per-user data directory. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous file intact.

pub mod best_score;

pub use best_score::BestScoreStore;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Overrides the data directory
pub const DATA_DIR_ENV: &str = "NEON_DRIFT_DATA_DIR";
const APP_DIR: &str = "NeonDrift";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    /// True when the file simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PersistenceError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Directory holding the best score and settings files
pub fn data_dir() -> PathBuf {
    resolve_data_dir(|key| std::env::var_os(key))
}

fn resolve_data_dir(var: impl Fn(&str) -> Option<OsString>) -> PathBuf {
    let non_empty = |key: &str| var(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(dir) = non_empty(DATA_DIR_ENV) {
        return dir;
    }
    if cfg!(windows) {
        if let Some(appdata) = non_empty("APPDATA") {
            return appdata.join(APP_DIR);
        }
    } else if let Some(xdg) = non_empty("XDG_DATA_HOME") {
        return xdg.join(APP_DIR);
    } else if let Some(home) = non_empty("HOME") {
        return home.join(".local").join("share").join(APP_DIR);
    }
    PathBuf::from(APP_DIR)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` to `path` via temp file + rename, creating parent dirs
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PersistenceError::Io { path, source }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, json).map_err(io_err(&tmp))?;
    std::fs::rename(&tmp, path).map_err(io_err(path))?;
    Ok(())
}
