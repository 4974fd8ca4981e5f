//! Animations compiled into the firmware.
//!
//! The blocking notifications and three idle animations live here so the
//! device can always show something, even with no SD card inserted. The
//! fallback animation has unbounded level/mood ranges and is never filtered,
//! which keeps the selector's candidate list non-empty.

use super::record::{AnimationMeta, AnimationRecord, AnimationSource, PlayableAnimation};

/// Idle animation used when nothing else qualifies or decoding fails.
pub const FALLBACK_ANIMATION_NAME: &str = "L1_Tv_128x47";
/// Idle animation only eligible while the battery is unhealthy.
pub const BAD_BATTERY_ANIMATION_NAME: &str = "L1_BadBattery_128x47";
/// Idle animation only eligible while no SD card is mounted.
pub const NO_SD_ANIMATION_NAME: &str = "L1_NoSd_128x49";

pub const BAD_SD_ANIMATION_NAME: &str = "L0_SdBad_128x51";
pub const SD_OK_ANIMATION_NAME: &str = "L0_SdOk_128x51";
pub const NO_DB_ANIMATION_NAME: &str = "L0_NoDb_128x51";
pub const URL_ANIMATION_NAME: &str = "L0_Url_128x51";
pub const LEVELUP_ANIMATION_NAME: &str = "L0_LevelUp_128x51";

/// A built-in entry plus whether it takes part in idle rotation.
#[derive(Debug, Clone)]
pub(crate) struct BuiltinEntry {
    pub record: AnimationRecord,
    pub idle: bool,
}

fn playable(
    name: &str,
    duration_secs: u32,
    frame_rate: u8,
    frame_count: usize,
) -> PlayableAnimation {
    PlayableAnimation {
        name: name.to_string(),
        duration_secs,
        frame_rate,
        frames: (0..frame_count).map(|i| format!("{name}/frame_{i}")).collect(),
    }
}

fn entry(meta: AnimationMeta, animation: PlayableAnimation, idle: bool) -> BuiltinEntry {
    BuiltinEntry {
        record: AnimationRecord {
            meta,
            source: AnimationSource::Builtin(animation),
        },
        idle,
    }
}

/// The fallback animation in playable form.
pub fn fallback_animation() -> PlayableAnimation {
    playable(FALLBACK_ANIMATION_NAME, 3600, 2, 6)
}

pub(crate) fn builtin_entries() -> Vec<BuiltinEntry> {
    vec![
        entry(
            AnimationMeta::unbounded(FALLBACK_ANIMATION_NAME, 3),
            fallback_animation(),
            true,
        ),
        entry(
            AnimationMeta::unbounded(BAD_BATTERY_ANIMATION_NAME, 7),
            playable(BAD_BATTERY_ANIMATION_NAME, 3600, 2, 2),
            true,
        ),
        entry(
            AnimationMeta::unbounded(NO_SD_ANIMATION_NAME, 6),
            playable(NO_SD_ANIMATION_NAME, 3600, 2, 4),
            true,
        ),
        entry(
            AnimationMeta::unbounded(BAD_SD_ANIMATION_NAME, 1),
            playable(BAD_SD_ANIMATION_NAME, 3600, 2, 2),
            false,
        ),
        entry(
            AnimationMeta::unbounded(SD_OK_ANIMATION_NAME, 1),
            playable(SD_OK_ANIMATION_NAME, 3600, 2, 2),
            false,
        ),
        entry(
            AnimationMeta::unbounded(NO_DB_ANIMATION_NAME, 1),
            playable(NO_DB_ANIMATION_NAME, 3600, 2, 4),
            false,
        ),
        entry(
            AnimationMeta::unbounded(URL_ANIMATION_NAME, 1),
            playable(URL_ANIMATION_NAME, 3600, 2, 4),
            false,
        ),
        entry(
            AnimationMeta::unbounded(LEVELUP_ANIMATION_NAME, 1),
            playable(LEVELUP_ANIMATION_NAME, 3600, 3, 8),
            false,
        ),
    ]
}
