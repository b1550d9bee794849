//! 2D geometry for point- and line-bearing series.

use geo::Point;
use serde::{Deserialize, Serialize};

/// A single 2D coordinate. Alias over `geo::Point<f32>` so geometry-bearing
/// containers interoperate with the wider `geo` ecosystem without the engine
/// needing its own vector math.
pub type Point2D = Point<f32>;

/// An ordered sequence of 2D points, e.g. a tracked whisker or limb outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    #[serde(with = "point_vec")]
    points: Vec<Point2D>,
}

impl Polyline {
    #[must_use]
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

mod point_vec {
    use super::Point2D;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xy {
        x: f32,
        y: f32,
    }

    pub fn serialize<S: Serializer>(points: &[Point2D], ser: S) -> Result<S::Ok, S::Error> {
        let xs: Vec<Xy> = points.iter().map(|p| Xy { x: p.x(), y: p.y() }).collect();
        xs.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Point2D>, D::Error> {
        let xs = Vec::<Xy>::deserialize(de)?;
        Ok(xs.into_iter().map(|xy| Point2D::new(xy.x, xy.y)).collect())
    }
}
