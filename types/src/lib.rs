//! Geometry and identifier primitives shared by the ethogram temporal-data engine.
//!
//! This crate provides the few types stable enough to sit below the engine
//! and any future external collaborator (loaders, renderers): the interval
//! algebra, entity identifiers, and 2D point/polyline geometry built on the
//! `geo` crate's primitives.

pub mod ids;
pub mod interval;
pub mod geometry;

pub use ids::EntityId;
pub use interval::Interval;
pub use geometry::{Point2D, Polyline};
