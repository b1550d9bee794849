//! The seven typed time-series containers built on [`crate::storage`].

pub mod analog;
pub mod event;
pub mod interval;
pub mod line;
pub mod mask;
pub mod point;
pub mod tensor;

pub use analog::AnalogTimeSeries;
pub use event::DigitalEventSeries;
pub use interval::{DigitalIntervalSeries, RangeMode};
pub use line::LineData;
pub use mask::MaskData;
pub use point::{ImageSize, PointData};
pub use tensor::{Tensor, TensorData};
