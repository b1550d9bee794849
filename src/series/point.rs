//! `PointData`: 2D points keyed by time.

use ethogram_types::{EntityId, Point2D};
use std::collections::BTreeMap;

/// One point observed at some time: its coordinates and assigned entity id.
pub type PointElement = (Point2D, EntityId);

/// Width/height in pixels, used only to scale coordinates at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// A time-keyed map from timestamp to the points observed at that time,
/// insertion order preserved within each timestamp's list.
pub struct PointData {
    by_time: BTreeMap<i64, Vec<PointElement>>,
    image_size: Option<ImageSize>,
}

impl PointData {
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

    /// Appends `(point, id)` to the list at `time`, preserving insertion order.
    pub fn add_point(&mut self, time: i64, point: Point2D, id: EntityId) {
        self.by_time.entry(time).or_default().push((point, id));
    }

    #[must_use]
    pub fn at(&self, time: i64) -> &[PointElement] {
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

    /// Every `(x, y)` pair observed at any time `t` with `start <= t <= end`.
    #[must_use]
    pub fn points_in_range(&self, start: i64, end: i64) -> Vec<Point2D> {
        self.by_time
            .range(start..=end)
            .flat_map(|(_, pts)| pts.iter().map(|(p, _)| *p))
            .collect()
    }
}

impl Default for PointData {
    fn default() -> Self {
        Self::new()
    }
}
