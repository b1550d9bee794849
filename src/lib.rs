//! Temporal-data engine for neuroscience/behavioral video analysis.
//!
//! ```rust
//! use ethogram_core::entity::EntityRegistry;
//! use ethogram_core::series::DigitalIntervalSeries;
//! use ethogram_types::Interval;
//!
//! let identity = EntityRegistry::new();
//! let mut behavior = DigitalIntervalSeries::new();
//! behavior.set_identity_context("grooming", identity.downgrade());
//! behavior.add_interval(Interval::new(100, 200), true);
//! behavior.add_interval(Interval::new(150, 250), true);
//! assert_eq!(behavior.len(), 1); // coalesced into {100, 250}
//! ```

pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod observer;
pub mod ops;
pub mod registry;
pub mod series;
pub mod storage;
pub mod time_frame;

pub use config::EngineConfig;
pub use context::ComputeContext;
pub use entity::{EntityKind, EntityRegistry, WeakEntityRegistry};
pub use error::{CoreError, Result};
pub use observer::{ObserverHook, ObserverId};
pub use registry::{builtin_transforms, TransformCategory, TransformMetadata, TransformRegistry};
pub use time_frame::{TimeFrame, TimeIndex};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for an application embedding this engine.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::context::ComputeContext;
    pub use crate::entity::{EntityKind, EntityRegistry, WeakEntityRegistry};
    pub use crate::error::{CoreError, Result};
    pub use crate::ops::{
        aggregate_data, analog_interval_peak, digital_interval_boolean, BooleanOp, ColumnConfig, OverlapStrategy,
        PeakParams, PeakType, Reference, References, SearchMode, TransformationType,
    };
    pub use crate::registry::{builtin_transforms, TransformRegistry};
    pub use crate::series::{
        AnalogTimeSeries, DigitalEventSeries, DigitalIntervalSeries, ImageSize, LineData, MaskData, PointData,
        RangeMode, Tensor, TensorData,
    };
    pub use crate::time_frame::{TimeFrame, TimeIndex};
    pub use ethogram_types::{interval, EntityId, Interval, Point2D, Polyline};
}
