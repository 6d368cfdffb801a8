//! Game settings and preferences
//!
//! Persisted as `settings.json` next to the best score.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};

const FILE_NAME: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Display ===
    /// Open borderless fullscreen (F11 toggles at runtime)
    pub start_fullscreen: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.6,
            mute_on_blur: true,

            start_fullscreen: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// `settings.json` in the per-user data directory
    pub fn default_path() -> PathBuf {
        persistence::data_dir().join(FILE_NAME)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Read settings from `path`; missing or corrupt files give defaults
    pub fn load_from(path: &Path) -> Self {
        match persistence::read_json::<Settings>(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) if e.is_not_found() => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::debug!("Ignoring settings file: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let path = Self::default_path();
        match self.save_to(&path) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::debug!("Failed to save settings: {e}"),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::write_json_atomic(path, self)
    }

    /// Clamp volumes into range; non-finite values fall back to defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.master_volume = clamp_volume(self.master_volume, defaults.master_volume);
        self.sfx_volume = clamp_volume(self.sfx_volume, defaults.sfx_volume);
        self.music_volume = clamp_volume(self.music_volume, defaults.music_volume);
        self
    }
}

fn clamp_volume(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        fallback
    }
}
