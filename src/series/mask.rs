//! `MaskData`: per-time pixel-set masks.

use crate::series::point::ImageSize;
use ethogram_types::EntityId;
use std::collections::BTreeMap;

/// A sparse set of `(x, y)` pixel coordinates belonging to one mask.
pub type MaskPixels = Vec<(u32, u32)>;

pub type MaskElement = (MaskPixels, EntityId);

/// A time-keyed map from timestamp to the masks observed at that time.
/// Mask image size is recorded once for the whole container, not per mask.
pub struct MaskData {
    by_time: BTreeMap<i64, Vec<MaskElement>>,
    image_size: Option<ImageSize>,
}

impl MaskData {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_time: BTreeMap::new(),
            image_size: None,
        }
    }

    pub fn set_image_size(&mut self, size: ImageSize) {
        self.image_size = Some(size);
    }

    #[must_use]
    pub fn image_size(&self) -> Option<ImageSize> {
        self.image_size
    }

    pub fn add_mask(&mut self, time: i64, pixels: MaskPixels, id: EntityId) {
        self.by_time.entry(time).or_default().push((pixels, id));
    }

    #[must_use]
    pub fn at(&self, time: i64) -> &[MaskElement] {
        self.by_time.get(&time).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn times(&self) -> Vec<i64> {
        self.by_time.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_time.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }
}

impl Default for MaskData {
    fn default() -> Self {
        Self::new()
    }
}
