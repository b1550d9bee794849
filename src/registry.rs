//! Process-wide transform registry.
//!
//! Per the engine's design notes, this is explicit state: constructed and
//! populated by the application shell at startup, not a lazy static. It
//! exists so operators in [`crate::ops`] can be looked up and dispatched by
//! name from outside the crate.

use rustc_hash::FxHashMap;

/// Coarse grouping of an operator, for UI/menu purposes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformCategory {
    IntervalAlgebra,
    AnalogAnalysis,
    Aggregation,
}

/// Metadata describing one registered operator.
#[derive(Debug, Clone)]
pub struct TransformMetadata {
    pub name: &'static str,
    pub input_arity: usize,
    pub category: TransformCategory,
    pub supports_cancellation: bool,
}

/// Maps operator names to their metadata. Owned and populated explicitly by
/// the embedding application; never constructed implicitly.
#[derive(Default)]
pub struct TransformRegistry {
    entries: FxHashMap<&'static str, TransformMetadata>,
}

impl TransformRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, metadata: TransformMetadata) {
        self.entries.insert(metadata.name, metadata);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TransformMetadata> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }
}

/// Metadata for the operators this crate ships, ready to hand to
/// [`TransformRegistry::register`].
#[must_use]
pub fn builtin_transforms() -> Vec<TransformMetadata> {
    vec![
        TransformMetadata {
            name: "digital_interval_boolean",
            input_arity: 2,
            category: TransformCategory::IntervalAlgebra,
            supports_cancellation: false,
        },
        TransformMetadata {
            name: "analog_interval_peak",
            input_arity: 2,
            category: TransformCategory::AnalogAnalysis,
            supports_cancellation: true,
        },
        TransformMetadata {
            name: "tabular_aggregation",
            input_arity: 1,
            category: TransformCategory::Aggregation,
            supports_cancellation: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut registry = TransformRegistry::new();
        for metadata in builtin_transforms() {
            registry.register(metadata);
        }
        let peak = registry.get("analog_interval_peak").unwrap();
        assert_eq!(peak.input_arity, 2);
        assert!(peak.supports_cancellation);
        assert!(registry.get("does_not_exist").is_none());
    }

    #[test]
    fn names_lists_everything_registered() {
        let mut registry = TransformRegistry::new();
        registry.register(builtin_transforms().remove(0));
        assert_eq!(registry.names(), vec!["digital_interval_boolean"]);
    }
}
