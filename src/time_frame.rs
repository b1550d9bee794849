//! Monotone sequence of timestamps and cross-frame index conversion.
//!
//! Grounded on the original `TimeFrame`/`TimeFrameAdapters` pair: a
//! `TimeFrame` is an immutable, shared, ordered sequence of ticks, and
//! conversion between two frames takes the "same instance" fast path by
//! pointer identity, not by comparing timestamps for equality.

use crate::error::{CoreError, Result};
use std::rc::Rc;

/// A strongly-typed position within a specific [`TimeFrame`]. Indices from
/// different frames are not comparable. The type carries no frame tag
/// beyond "caller's responsibility", matching the spec's note that this is
/// a naming convention enforced by discipline, not the type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeIndex(pub i64);

impl TimeIndex {
    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for TimeIndex {
    fn from(value: i64) -> Self {
        TimeIndex(value)
    }
}

/// An ordered, non-decreasing sequence of timestamps shared by reference
/// among the series that use it. Fixed-size after construction.
#[derive(Debug, PartialEq)]
pub struct TimeFrame {
    timestamps: Vec<i64>,
}

impl TimeFrame {
    /// Build a new `TimeFrame`. Rejects an empty sequence; does not check
    /// monotonicity beyond documenting it as caller's responsibility, in
    /// line with loaders being the sole producers of raw timestamp vectors.
    pub fn new(timestamps: Vec<i64>) -> Result<Rc<Self>> {
        if timestamps.is_empty() {
            return Err(CoreError::EmptyTimeFrame);
        }
        Ok(Rc::new(Self { timestamps }))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn clamp(&self, index: i64) -> usize {
        index.clamp(0, self.timestamps.len() as i64 - 1) as usize
    }

    /// `O(1)` lookup, clamped to `[0, N-1]`.
    #[must_use]
    pub fn time_at(&self, index: TimeIndex) -> i64 {
        self.timestamps[self.clamp(index.0)]
    }

    /// Binary search for the timestamp. When `round_up` is `true`, returns
    /// the first index with `t[i] >= timestamp`; otherwise the last index
    /// with `t[i] <= timestamp`. Out-of-range timestamps clamp to the
    /// nearest valid index.
    #[must_use]
    pub fn index_at(&self, timestamp: i64, round_up: bool) -> TimeIndex {
        let n = self.timestamps.len();
        if round_up {
            let pos = self.timestamps.partition_point(|&t| t < timestamp);
            TimeIndex(pos.min(n - 1) as i64)
        } else {
            let pos = self.timestamps.partition_point(|&t| t <= timestamp);
            TimeIndex(pos.saturating_sub(1) as i64)
        }
    }

    /// Converts a closed index range `[start_idx, stop_idx]` expressed in
    /// `source_frame` into the equivalent range in `target_frame`.
    ///
    /// Takes the identity fast path, returning the inputs unchanged, only
    /// when `source_frame` and `target_frame` are the *same instance*
    /// (`Rc::ptr_eq`): two frames with equal timestamps but
    /// distinct instances still pay for conversion.
    #[must_use]
    pub fn convert_range(
        start_idx: TimeIndex,
        stop_idx: TimeIndex,
        source_frame: &Rc<TimeFrame>,
        target_frame: &Rc<TimeFrame>,
    ) -> (TimeIndex, TimeIndex) {
        if Rc::ptr_eq(source_frame, target_frame) {
            return (start_idx, stop_idx);
        }
        let t_start = source_frame.time_at(start_idx);
        let t_stop = source_frame.time_at(stop_idx);
        (
            target_frame.index_at(t_start, false),
            target_frame.index_at(t_stop, true),
        )
    }
}
