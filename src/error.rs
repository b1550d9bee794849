//! Error taxonomy for the temporal-data engine.
//!
//! Per the engine's error-handling design, most data-driven failures (a
//! reversed interval, a missing aggregation reference, an out-of-range
//! index) are not represented here at all; they are silently handled at
//! the call site and logged via [`log`]. `CoreError` exists for the
//! "programmer error" class (unknown enumerators and malformed
//! configuration, which are fatal for the call that triggered them), plus
//! `InvariantViolation` for the data-driven failures a caller has opted
//! into treating as fatal via [`crate::config::EngineConfig::strict_validation`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("time frame must contain at least one timestamp")]
    EmptyTimeFrame,

    #[error("unknown boolean operation {0:?}")]
    UnknownBooleanOperation(String),

    #[error("unknown transformation type {0:?}")]
    UnknownTransformation(String),

    #[error("unknown overlap strategy {0:?}")]
    UnknownOverlapStrategy(String),

    #[error("series pointer was null where a series was required")]
    NullSeries,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
