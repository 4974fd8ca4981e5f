//! Weighted random choice of the next idle animation.
//!
//! Candidates are filtered against the current signal snapshot, then one is
//! drawn with probability proportional to its weight. The scan is linear in
//! catalog order; catalogs hold tens of entries.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::catalog::{
    AnimationMeta, AnimationRecord, Catalog, PlayableAnimation, BAD_BATTERY_ANIMATION_NAME,
    NO_SD_ANIMATION_NAME,
};
use crate::signals::{ProgressionStats, Signals};

/// Signal snapshot the filter runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    pub battery_healthy: bool,
    pub storage_mounted: bool,
    pub stats: ProgressionStats,
}

impl SelectionContext {
    pub fn from_signals(signals: &Signals) -> Self {
        Self {
            battery_healthy: signals.battery.battery_is_healthy(),
            storage_mounted: signals.storage.storage_status().is_mounted(),
            stats: signals.progression.progression_stats(),
        }
    }

    pub fn is_eligible(&self, meta: &AnimationMeta) -> bool {
        if self.battery_healthy && meta.name == BAD_BATTERY_ANIMATION_NAME {
            return false;
        }
        if self.storage_mounted && meta.name == NO_SD_ANIMATION_NAME {
            return false;
        }
        meta.accepts(&self.stats)
    }
}

/// Keep the candidates eligible under `context`, preserving catalog order.
pub fn filter_candidates(
    records: Vec<AnimationRecord>,
    context: &SelectionContext,
) -> Vec<AnimationRecord> {
    records
        .into_iter()
        .filter(|record| {
            let eligible = context.is_eligible(&record.meta);
            if !eligible {
                tracing::debug!("Filtered out '{}'", record.meta.name);
            }
            eligible
        })
        .collect()
}

/// Index of the first candidate whose cumulative weight exceeds `draw`.
///
/// Returns `None` only when `draw` is not below the total weight.
pub fn pick_index(weights: &[u32], draw: u64) -> Option<usize> {
    let mut cumulative = 0u64;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += u64::from(*weight);
        if cumulative > draw {
            return Some(index);
        }
    }
    None
}

/// Idle animation picker with its own random stream.
#[derive(Debug, Clone)]
pub struct Selector {
    rng: Mcg128Xsl64,
}

impl Selector {
    /// A fixed seed makes the sequence of picks reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self { rng }
    }

    /// Uniform draw in `[0, total_weight)`.
    pub fn draw(&mut self, total_weight: u64) -> u64 {
        self.rng.gen_range(0..total_weight)
    }

    /// Choose and materialize the next idle animation.
    ///
    /// # Panics
    ///
    /// Panics if no candidate survives filtering. The catalog's fallback
    /// animation is unbounded and must always be listed.
    pub fn select<C>(&mut self, catalog: &C, context: &SelectionContext) -> PlayableAnimation
    where
        C: Catalog + ?Sized,
    {
        let candidates = filter_candidates(catalog.list(), context);
        let weights: Vec<u32> = candidates.iter().map(|r| r.meta.weight).collect();
        let total_weight: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        assert!(
            total_weight > 0,
            "no eligible idle animation: the fallback animation must always qualify"
        );

        let draw = self.draw(total_weight);
        let Some(index) = pick_index(&weights, draw) else {
            unreachable!("draw {draw} is below total weight {total_weight}");
        };
        let Some(record) = candidates.into_iter().nth(index) else {
            unreachable!("picked index {index} is within the candidate list");
        };

        let name = record.meta.name.clone();
        match catalog.materialize(record) {
            Ok(animation) => animation,
            Err(e) => {
                tracing::error!("Can't load animation described in manifest: '{}': {}", name, e);
                catalog.fallback()
            }
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AnimationSource, ManifestCatalog, FALLBACK_ANIMATION_NAME};

    fn context(battery_healthy: bool, storage_mounted: bool) -> SelectionContext {
        SelectionContext {
            battery_healthy,
            storage_mounted,
            stats: ProgressionStats {
                level: 1,
                mood: 0,
                level_up_pending: false,
            },
        }
    }

    #[test]
    fn pick_index_walks_cumulative_weights() {
        let weights = [1, 1, 2];
        assert_eq!(pick_index(&weights, 0), Some(0));
        assert_eq!(pick_index(&weights, 1), Some(1));
        assert_eq!(pick_index(&weights, 2), Some(2));
        assert_eq!(pick_index(&weights, 3), Some(2));
        assert_eq!(pick_index(&weights, 4), None);
    }

    #[test]
    fn draws_spanning_total_weight_favor_heavier_candidate() {
        let weights = [1, 1, 2];
        let picks = (0..10_000u64)
            .filter(|i| pick_index(&weights, i % 4) == Some(2))
            .count();
        assert_eq!(picks, 5_000);
    }

    #[test]
    fn seeded_draws_match_weights_within_tolerance() {
        let weights = [1, 1, 2];
        let mut selector = Selector::new(Some(42));
        let picks = (0..10_000)
            .filter(|_| pick_index(&weights, selector.draw(4)) == Some(2))
            .count();
        let share = picks as f64 / 10_000.0;
        assert!((share - 0.5).abs() < 0.03, "share was {share}");
    }

    #[test]
    fn healthy_battery_and_mounted_card_hide_warning_animations() {
        let catalog = ManifestCatalog::builtin_only();
        let names: Vec<_> = filter_candidates(catalog.list(), &context(true, true))
            .into_iter()
            .map(|r| r.meta.name)
            .collect();
        assert_eq!(names, vec![FALLBACK_ANIMATION_NAME]);

        let all = filter_candidates(catalog.list(), &context(false, false));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn level_and_mood_bounds_filter_candidates() {
        let ctx = SelectionContext {
            stats: ProgressionStats {
                level: 3,
                mood: 12,
                level_up_pending: false,
            },
            ..context(true, true)
        };
        assert!(!ctx.is_eligible(&AnimationMeta::unbounded("a", 1).with_levels(1, 2)));
        assert!(!ctx.is_eligible(&AnimationMeta::unbounded("b", 1).with_mood(0, 10)));
        assert!(ctx.is_eligible(&AnimationMeta::unbounded("c", 1).with_levels(3, 3)));
    }

    #[test]
    fn decode_failure_falls_back_to_builtin() {
        let broken = AnimationRecord {
            meta: AnimationMeta::unbounded("L1_Broken_128x64", 1_000_000),
            source: AnimationSource::Asset("/nonexistent/L1_Broken_128x64".into()),
        };
        let catalog = ManifestCatalog::with_records(vec![broken]);
        let mut selector = Selector::new(Some(7));
        for _ in 0..20 {
            let anim = selector.select(&catalog, &context(true, true));
            assert_eq!(anim.name, FALLBACK_ANIMATION_NAME);
        }
    }

    #[test]
    #[should_panic(expected = "no eligible idle animation")]
    fn empty_candidate_list_is_fatal() {
        struct EmptyCatalog;
        impl Catalog for EmptyCatalog {
            fn list(&self) -> Vec<AnimationRecord> {
                Vec::new()
            }
            fn find(&self, _name: &str) -> Option<AnimationRecord> {
                None
            }
            fn materialize(
                &self,
                record: AnimationRecord,
            ) -> Result<PlayableAnimation, crate::error::CatalogError> {
                Err(crate::error::CatalogError::NotFound(record.meta.name))
            }
            fn fallback(&self) -> PlayableAnimation {
                crate::catalog::fallback_animation()
            }
        }
        Selector::new(Some(1)).select(&EmptyCatalog, &context(true, true));
    }
}
