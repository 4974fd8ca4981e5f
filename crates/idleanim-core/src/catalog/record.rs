use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::signals::ProgressionStats;

/// Manifest metadata describing when an animation may be picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationMeta {
    pub name: String,
    /// Relative selection weight. Always non-zero for catalog entries.
    pub weight: u32,
    #[serde(default)]
    pub min_level: u32,
    #[serde(default = "default_max_bound")]
    pub max_level: u32,
    /// Lower bound of the mood ("butthurt") counter.
    #[serde(default)]
    pub min_mood: u32,
    #[serde(default = "default_max_bound")]
    pub max_mood: u32,
}

fn default_max_bound() -> u32 {
    u32::MAX
}

impl AnimationMeta {
    /// Metadata that matches every level and mood.
    pub fn unbounded(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            min_level: 0,
            max_level: u32::MAX,
            min_mood: 0,
            max_mood: u32::MAX,
        }
    }

    pub fn with_levels(mut self, min: u32, max: u32) -> Self {
        self.min_level = min;
        self.max_level = max;
        self
    }

    pub fn with_mood(mut self, min: u32, max: u32) -> Self {
        self.min_mood = min;
        self.max_mood = max;
        self
    }

    /// Whether the current progression falls within both bounds.
    pub fn accepts(&self, stats: &ProgressionStats) -> bool {
        (self.min_mood..=self.max_mood).contains(&stats.mood)
            && (self.min_level..=self.max_level).contains(&stats.level)
    }
}

/// Where the playable form of a record comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationSource {
    /// Compiled into the firmware; materializing never fails.
    Builtin(PlayableAnimation),
    /// Stored on external media under this directory.
    Asset(PathBuf),
}

/// One catalog entry. Whoever holds the record owns its lazily
/// materialized playable form.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRecord {
    pub meta: AnimationMeta,
    pub source: AnimationSource,
}

/// Decoded, render-ready animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableAnimation {
    pub name: String,
    /// How long the animation stays on screen while idle, in seconds.
    pub duration_secs: u32,
    pub frame_rate: u8,
    /// Frame asset identifiers in playback order.
    pub frames: Vec<String>,
}

impl PlayableAnimation {
    /// Display duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_secs).saturating_mul(1000)
    }
}
