//! Named resource bundles
//!
//! A bundle is a manifest file under `<root>/bundles/` listing assets, one
//! per line:
//!
//! ```text
//! # comment
//! SOUND,pickup,pickup.wav      effect from <root>/sounds/
//! MUSIC,bgm,bgm.ogg            music track from <root>/sounds/
//! TONE,gameover,196,420        synthesised effect: frequency Hz, length ms
//! ```
//!
//! Loading registers every asset with the [`SoundBank`]; freeing the bundle
//! unregisters them again.

pub mod tone;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::SoundBank;

/// Overrides the resource root directory
pub const RESOURCES_ENV: &str = "NEON_DRIFT_RESOURCES";
const DEFAULT_ROOT: &str = "resources";

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("bundle name must not be empty")]
    EmptyBundleName,

    #[error("manifest name must not be empty")]
    EmptyManifestName,

    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{manifest} line {line}: {message}")]
    Parse {
        manifest: String,
        line: usize,
        message: String,
    },
}

/// One manifest line
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestEntry {
    Sound { name: String, file: String },
    Music { name: String, file: String },
    Tone { name: String, freq_hz: f32, ms: u32 },
}

impl ManifestEntry {
    pub fn name(&self) -> &str {
        match self {
            ManifestEntry::Sound { name, .. }
            | ManifestEntry::Music { name, .. }
            | ManifestEntry::Tone { name, .. } => name,
        }
    }
}

/// Parse manifest text. Errors carry the 1-based line number.
pub fn parse_manifest(text: &str) -> Result<Vec<ManifestEntry>, (usize, String)> {
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let entry = parse_line(&fields).map_err(|message| (index + 1, message))?;
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_line(fields: &[&str]) -> Result<ManifestEntry, String> {
    let kind = fields[0].to_ascii_uppercase();
    let name = fields.get(1).copied().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("{kind} entry is missing a name"));
    }
    let name = name.to_owned();

    match (kind.as_str(), &fields[2..]) {
        ("SOUND", [file]) if !file.is_empty() => Ok(ManifestEntry::Sound {
            name,
            file: (*file).to_owned(),
        }),
        ("MUSIC", [file]) if !file.is_empty() => Ok(ManifestEntry::Music {
            name,
            file: (*file).to_owned(),
        }),
        ("TONE", [freq, ms]) => {
            let freq_hz = freq
                .parse::<f32>()
                .ok()
                .filter(|f| f.is_finite() && *f > 0.0)
                .ok_or_else(|| format!("bad tone frequency {freq:?}"))?;
            let ms = ms
                .parse::<u32>()
                .ok()
                .filter(|ms| *ms <= tone::MAX_TONE_MS)
                .ok_or_else(|| {
                    format!("bad tone length {ms:?} (0..={} ms)", tone::MAX_TONE_MS)
                })?;
            Ok(ManifestEntry::Tone { name, freq_hz, ms })
        }
        ("SOUND" | "MUSIC", _) => Err(format!("{kind} expects KIND,name,file")),
        ("TONE", _) => Err("TONE expects TONE,name,freq_hz,ms".to_owned()),
        _ => Err(format!("unknown resource kind {kind:?}")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Effect,
    Music,
}

/// Bundle registry rooted at a resource directory
#[derive(Debug)]
pub struct ResourceBundles {
    root: PathBuf,
    loaded: HashMap<String, Vec<(AssetKind, String)>>,
}

impl ResourceBundles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            loaded: HashMap::new(),
        }
    }

    /// Root from `NEON_DRIFT_RESOURCES`, else `./resources`
    pub fn from_env() -> Self {
        let root = std::env::var_os(RESOURCES_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_loaded(&self, bundle: &str) -> bool {
        self.loaded.contains_key(bundle)
    }

    /// Load `<root>/bundles/<manifest>` as `bundle`.
    ///
    /// An already loaded bundle is left alone. Sound files that are missing
    /// or unreadable are skipped.
    pub fn load(
        &mut self,
        bundle: &str,
        manifest: &str,
        audio: &mut SoundBank,
    ) -> Result<(), ResourceError> {
        if bundle.is_empty() {
            return Err(ResourceError::EmptyBundleName);
        }
        if manifest.is_empty() {
            return Err(ResourceError::EmptyManifestName);
        }
        if self.is_loaded(bundle) {
            log::debug!("Bundle {bundle:?} already loaded");
            return Ok(());
        }

        let path = self.root.join("bundles").join(manifest);
        let text = std::fs::read_to_string(&path).map_err(|source| ResourceError::Io {
            path: path.clone(),
            source,
        })?;
        let entries = parse_manifest(&text).map_err(|(line, message)| ResourceError::Parse {
            manifest: manifest.to_owned(),
            line,
            message,
        })?;

        let mut registered = Vec::with_capacity(entries.len());
        for entry in &entries {
            if let Some(asset) = self.register(entry, audio) {
                registered.push(asset);
            }
        }

        log::info!(
            "Loaded bundle {bundle:?}: {} of {} assets",
            registered.len(),
            entries.len()
        );
        self.loaded.insert(bundle.to_owned(), registered);
        Ok(())
    }

    /// Unregister every asset `bundle` loaded. Unknown bundles are ignored.
    pub fn free(&mut self, bundle: &str, audio: &mut SoundBank) {
        let Some(assets) = self.loaded.remove(bundle) else {
            return;
        };
        for (kind, name) in &assets {
            match kind {
                AssetKind::Effect => audio.unregister_effect(name),
                AssetKind::Music => audio.unregister_music(name),
            };
        }
        log::info!("Freed bundle {bundle:?} ({} assets)", assets.len());
    }

    fn register(
        &self,
        entry: &ManifestEntry,
        audio: &mut SoundBank,
    ) -> Option<(AssetKind, String)> {
        let name = entry.name();
        match entry {
            ManifestEntry::Tone { freq_hz, ms, .. } => {
                audio.register_effect(name, Arc::from(tone::tone_wav(*freq_hz, *ms)));
                Some((AssetKind::Effect, name.to_owned()))
            }
            ManifestEntry::Sound { file, .. } => {
                let data = self.read_sound(file)?;
                audio.register_effect(name, data);
                Some((AssetKind::Effect, name.to_owned()))
            }
            ManifestEntry::Music { file, .. } => {
                let data = self.read_sound(file)?;
                audio.register_music(name, data);
                Some((AssetKind::Music, name.to_owned()))
            }
        }
    }

    fn read_sound(&self, file: &str) -> Option<Arc<[u8]>> {
        let path = self.root.join("sounds").join(file);
        match std::fs::read(&path) {
            Ok(bytes) => Some(Arc::from(bytes)),
            Err(e) => {
                log::debug!("Skipping sound {}: {e}", path.display());
                None
            }
        }
    }
}
