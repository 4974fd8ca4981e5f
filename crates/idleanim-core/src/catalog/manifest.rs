//! Catalog backed by the built-in animations plus a TOML manifest on external media.
//!
//! The manifest lists idle animations:
//!
//! ```toml
//! [[animation]]
//! name = "L1_Waves_128x50"
//! weight = 3
//! min_level = 1
//! max_level = 2
//! min_mood = 0
//! max_mood = 9
//! ```
//!
//! Each entry's assets live in `<asset_dir>/<name>/meta.toml`, which is only
//! read when the animation is materialized.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::builtin::{builtin_entries, fallback_animation, BuiltinEntry};
use super::record::{AnimationMeta, AnimationRecord, AnimationSource, PlayableAnimation};
use super::Catalog;
use crate::error::CatalogError;
use crate::storage::CatalogConfig;

/// File describing one asset-backed animation.
pub const ASSET_META_FILE: &str = "meta.toml";

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default, rename = "animation")]
    animations: Vec<AnimationMeta>,
}

#[derive(Debug, Deserialize)]
struct AssetMeta {
    duration_secs: u32,
    frame_rate: u8,
    #[serde(default)]
    frames: Vec<String>,
}

/// Built-in animations merged with the manifest's idle entries.
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    manifest: Vec<AnimationRecord>,
    builtins: Vec<BuiltinEntry>,
}

impl ManifestCatalog {
    /// Catalog with only the firmware animations (no media inserted).
    pub fn builtin_only() -> Self {
        Self {
            manifest: Vec::new(),
            builtins: builtin_entries(),
        }
    }

    /// Catalog with extra records appended after validation.
    pub fn with_records(records: Vec<AnimationRecord>) -> Self {
        let mut catalog = Self::builtin_only();
        for record in records {
            catalog.push_record(record);
        }
        catalog
    }

    /// Parse manifest text; asset directories resolve relative to `asset_dir`.
    pub fn from_manifest_str(content: &str, asset_dir: &Path) -> Result<Self, CatalogError> {
        let parsed: ManifestFile =
            toml::from_str(content).map_err(|e| CatalogError::InvalidManifest(e.to_string()))?;
        let records = parsed
            .animations
            .into_iter()
            .map(|meta| AnimationRecord {
                source: AnimationSource::Asset(asset_dir.join(&meta.name)),
                meta,
            })
            .collect();
        Ok(Self::with_records(records))
    }

    /// Read `<asset_dir>/<manifest_file>`.
    pub fn load(asset_dir: &Path, manifest_file: &str) -> Result<Self, CatalogError> {
        let path = asset_dir.join(manifest_file);
        let content = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_manifest_str(&content, asset_dir).map_err(|e| match e {
            CatalogError::InvalidManifest(message) => CatalogError::Parse { path, message },
            other => other,
        })
    }

    /// Build from configuration, degrading to built-ins when the manifest
    /// is missing or unreadable.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let Some(dir) = config.asset_dir.as_deref() else {
            return Self::builtin_only();
        };
        match Self::load(Path::new(dir), &config.manifest_file) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Manifest unavailable, using built-in animations only: {}", e);
                Self::builtin_only()
            }
        }
    }

    /// Number of manifest entries accepted.
    pub fn manifest_len(&self) -> usize {
        self.manifest.len()
    }

    fn push_record(&mut self, record: AnimationRecord) {
        let meta = &record.meta;
        if meta.weight == 0 {
            tracing::warn!("Skipping '{}': weight must be non-zero", meta.name);
            return;
        }
        if meta.min_level > meta.max_level || meta.min_mood > meta.max_mood {
            tracing::warn!("Skipping '{}': inverted level or mood bounds", meta.name);
            return;
        }
        if self.find(&meta.name).is_some() {
            tracing::warn!("Skipping '{}': duplicate animation name", meta.name);
            return;
        }
        self.manifest.push(record);
    }

    fn decode_asset(name: &str, dir: &Path) -> Result<PlayableAnimation, CatalogError> {
        let path: PathBuf = dir.join(ASSET_META_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| CatalogError::decode(name, format!("{}: {e}", path.display())))?;
        let meta: AssetMeta = toml::from_str(&content)
            .map_err(|e| CatalogError::decode(name, format!("{}: {e}", path.display())))?;
        if meta.duration_secs == 0 {
            return Err(CatalogError::decode(name, "duration must be non-zero"));
        }
        if meta.frames.is_empty() {
            return Err(CatalogError::decode(name, "no frames listed"));
        }
        Ok(PlayableAnimation {
            name: name.to_string(),
            duration_secs: meta.duration_secs,
            frame_rate: meta.frame_rate,
            frames: meta.frames,
        })
    }
}

impl Default for ManifestCatalog {
    fn default() -> Self {
        Self::builtin_only()
    }
}

impl Catalog for ManifestCatalog {
    fn list(&self) -> Vec<AnimationRecord> {
        self.manifest
            .iter()
            .cloned()
            .chain(
                self.builtins
                    .iter()
                    .filter(|e| e.idle)
                    .map(|e| e.record.clone()),
            )
            .collect()
    }

    fn find(&self, name: &str) -> Option<AnimationRecord> {
        self.manifest
            .iter()
            .chain(self.builtins.iter().map(|e| &e.record))
            .find(|r| r.meta.name == name)
            .cloned()
    }

    fn materialize(&self, record: AnimationRecord) -> Result<PlayableAnimation, CatalogError> {
        match record.source {
            AnimationSource::Builtin(animation) => Ok(animation),
            AnimationSource::Asset(dir) => Self::decode_asset(&record.meta.name, &dir),
        }
    }

    fn fallback(&self) -> PlayableAnimation {
        fallback_animation()
    }
}
