//! Animation catalog: enumerates animation definitions and materializes
//! their playable form on demand.

mod builtin;
mod manifest;
mod record;

pub use builtin::{
    fallback_animation, BAD_BATTERY_ANIMATION_NAME, BAD_SD_ANIMATION_NAME,
    FALLBACK_ANIMATION_NAME, LEVELUP_ANIMATION_NAME, NO_DB_ANIMATION_NAME,
    NO_SD_ANIMATION_NAME, SD_OK_ANIMATION_NAME, URL_ANIMATION_NAME,
};
pub use manifest::{ManifestCatalog, ASSET_META_FILE};
pub use record::{AnimationMeta, AnimationRecord, AnimationSource, PlayableAnimation};

use crate::error::CatalogError;

/// Source of animation definitions.
///
/// `list` returns idle candidates in catalog order, which is the order the
/// selector walks when resolving a weighted draw. `find` also resolves the
/// built-in blocking animations.
pub trait Catalog: Send {
    fn list(&self) -> Vec<AnimationRecord>;

    fn find(&self, name: &str) -> Option<AnimationRecord>;

    /// Decode a record into its playable form. May fail for corrupt assets.
    fn materialize(&self, record: AnimationRecord) -> Result<PlayableAnimation, CatalogError>;

    /// The built-in animation that always decodes.
    fn fallback(&self) -> PlayableAnimation;

    /// Find and materialize in one step.
    fn load(&self, name: &str) -> Result<PlayableAnimation, CatalogError> {
        let record = self
            .find(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        self.materialize(record)
    }
}
