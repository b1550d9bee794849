//! `LineData`: polylines keyed by time.

use crate::series::point::ImageSize;
use ethogram_types::{EntityId, Polyline};
use std::collections::BTreeMap;

pub type LineElement = (Polyline, EntityId);

/// A time-keyed map from timestamp to the polylines observed at that time.
pub struct LineData {
    by_time: BTreeMap<i64, Vec<LineElement>>,
    image_size: Option<ImageSize>,
}

impl LineData {
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

    pub fn add_line(&mut self, time: i64, line: Polyline, id: EntityId) {
        self.by_time.entry(time).or_default().push((line, id));
    }

    #[must_use]
    pub fn at(&self, time: i64) -> &[LineElement] {
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

impl Default for LineData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethogram_types::Point2D;

    fn line(pts: &[(f32, f32)]) -> Polyline {
        Polyline::new(pts.iter().map(|&(x, y)| Point2D::new(x, y)).collect())
    }

    #[test]
    fn add_line_preserves_insertion_order() {
        let mut data = LineData::new();
        data.add_line(0, line(&[(0.0, 0.0), (1.0, 1.0)]), EntityId(1));
        data.add_line(0, line(&[(2.0, 2.0)]), EntityId(2));
        let ids: Vec<EntityId> = data.at(0).iter().map(|(_, id)| *id).collect();
        assert_eq!(ids, vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn missing_time_returns_empty_slice() {
        let data = LineData::new();
        assert!(data.at(7).is_empty());
    }
}
