//! Blocking-condition evaluation.
//!
//! Priority order, first match wins:
//!
//! 1. storage internal error -> bad SD card
//! 2. storage not ready -> re-open the SD-ok and no-database latches
//! 3. storage ok, SD ok not yet shown -> SD ok
//! 4. storage ok, no database file, not yet shown -> no database (arms URL)
//! 5. storage ok, URL armed -> show URL
//! 6. level-up pending, whatever the storage outcome -> level up
//!
//! Steps 3-5 are latched; level-up re-fires for as long as it is pending.

use serde::{Deserialize, Serialize};

use super::state::NotificationLatches;
use crate::catalog::{
    BAD_SD_ANIMATION_NAME, LEVELUP_ANIMATION_NAME, NO_DB_ANIMATION_NAME, SD_OK_ANIMATION_NAME,
    URL_ANIMATION_NAME,
};
use crate::signals::{ProgressionStats, StorageStatus};

/// Why a blocking animation preempts idle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingReason {
    BadSdCard,
    SdCardOk,
    NoDatabase,
    ShowUrl,
    LevelUp,
}

impl BlockingReason {
    pub fn animation_name(self) -> &'static str {
        match self {
            BlockingReason::BadSdCard => BAD_SD_ANIMATION_NAME,
            BlockingReason::SdCardOk => SD_OK_ANIMATION_NAME,
            BlockingReason::NoDatabase => NO_DB_ANIMATION_NAME,
            BlockingReason::ShowUrl => URL_ANIMATION_NAME,
            BlockingReason::LevelUp => LEVELUP_ANIMATION_NAME,
        }
    }
}

/// Evaluate the blocking conditions, updating the latches as a side effect.
///
/// `database_present` is only queried when the card is mounted and the
/// no-database notification has not been shown yet.
pub fn evaluate(
    latches: &mut NotificationLatches,
    storage: StorageStatus,
    database_present: impl FnOnce() -> bool,
    stats: &ProgressionStats,
) -> Option<BlockingReason> {
    let from_storage = match storage {
        StorageStatus::InternalError => Some(BlockingReason::BadSdCard),
        StorageStatus::NotReady => {
            latches.sd_card_ok_shown = false;
            latches.no_database_shown = false;
            None
        }
        StorageStatus::Ok => {
            if !latches.sd_card_ok_shown {
                latches.sd_card_ok_shown = true;
                Some(BlockingReason::SdCardOk)
            } else if !latches.no_database_shown {
                if database_present() {
                    None
                } else {
                    latches.no_database_shown = true;
                    latches.show_url_once = true;
                    Some(BlockingReason::NoDatabase)
                }
            } else if latches.show_url_once {
                latches.show_url_once = false;
                Some(BlockingReason::ShowUrl)
            } else {
                None
            }
        }
    };

    from_storage.or(stats.level_up_pending.then_some(BlockingReason::LevelUp))
}
