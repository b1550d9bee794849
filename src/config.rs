//! Engine-wide configuration.
//!
//! Small and serializable, in the shape of the teacher's `Config`
//! (`validate()` / `to_json()` / `from_json()`), but scoped to the handful
//! of knobs this engine actually has an opinion about. There is no
//! persistence, sync policy, or TTL here, since those are collaborator concerns
//! this core does not own.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Engine-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity hint used when allocating a new Owning storage backend.
    #[serde(default = "EngineConfig::default_capacity")]
    pub default_series_capacity: usize,

    /// When `true`, the `_checked` loader entry points
    /// (`DigitalIntervalSeries::from_intervals_checked`,
    /// `AnalogTimeSeries::from_parallel_checked`) return
    /// `Err(CoreError::InvariantViolation)` on invariant-violating input
    /// instead of discarding it with a diagnostic log. Defaults to `false`
    /// so default behavior matches the engine's documented error design.
    #[serde(default)]
    pub strict_validation: bool,
}

impl EngineConfig {
    const fn default_capacity() -> usize {
        16
    }

    #[must_use]
    pub fn with_default_series_capacity(mut self, capacity: usize) -> Self {
        self.default_series_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_series_capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "default_series_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_series_capacity: Self::default_capacity(),
            strict_validation: false,
        }
    }
}
