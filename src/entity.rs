//! Process-scoped registry assigning stable [`EntityId`]s to series elements.
//!
//! Constructed explicitly by the application shell, per the engine's design
//! notes: this is *not* a lazy-static singleton. Series hold a [`Weak`]
//! reference; if the registry has been dropped, every lookup degrades to
//! `EntityId(0)` rather than panicking.

use ethogram_types::EntityId;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// The kind of element an [`EntityId`] was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Event,
    Interval,
    Point,
    Line,
    Mask,
}

/// Identifies one element: which series produced it, what kind it is, and
/// where it sits (representative timestamp index and position within that
/// timestamp's elements).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
    pub data_key: String,
    pub kind: EntityKind,
    pub time_index: i64,
    pub local_index: usize,
}

struct Inner {
    descriptors: Vec<Descriptor>,
    by_descriptor: FxHashMap<Descriptor, EntityId>,
}

/// Shared, mutable entity registry. Clone to obtain another strong handle;
/// call [`EntityRegistry::downgrade`] to hand series a non-owning reference.
#[derive(Clone)]
pub struct EntityRegistry {
    inner: Rc<RefCell<Inner>>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                descriptors: Vec::new(),
                by_descriptor: FxHashMap::default(),
            })),
        }
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakEntityRegistry {
        WeakEntityRegistry(Rc::downgrade(&self.inner))
    }

    /// Returns the existing id for an identical descriptor tuple, or
    /// allocates a fresh monotone one (`max_allocated + 1`).
    pub fn ensure_id(
        &self,
        data_key: impl Into<String>,
        kind: EntityKind,
        time_index: i64,
        local_index: usize,
    ) -> EntityId {
        let descriptor = Descriptor {
            data_key: data_key.into(),
            kind,
            time_index,
            local_index,
        };
        let mut inner = self.inner.borrow_mut();
        if let Some(&id) = inner.by_descriptor.get(&descriptor) {
            return id;
        }
        let id = EntityId((inner.descriptors.len() as u64) + 1);
        inner.by_descriptor.insert(descriptor.clone(), id);
        inner.descriptors.push(descriptor);
        id
    }

    /// `O(1)` lookup by id. Ids are never reused, so an absent id is either
    /// `0` (never assigned) or out of range.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<Descriptor> {
        if id.0 == 0 {
            return None;
        }
        let inner = self.inner.borrow();
        inner.descriptors.get((id.0 - 1) as usize).cloned()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-owning handle held by series. Resolves to `EntityId(0)` for every
/// lookup once the registry has been dropped.
#[derive(Clone)]
pub struct WeakEntityRegistry(Weak<RefCell<Inner>>);

impl WeakEntityRegistry {
    #[must_use]
    pub fn none() -> Self {
        Self(Weak::new())
    }

    pub fn ensure_id(
        &self,
        data_key: impl Into<String>,
        kind: EntityKind,
        time_index: i64,
        local_index: usize,
    ) -> EntityId {
        match self.0.upgrade() {
            Some(inner) => EntityRegistry { inner }.ensure_id(data_key, kind, time_index, local_index),
            None => EntityId(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_id_is_idempotent_and_roundtrips() {
        let registry = EntityRegistry::new();
        let id1 = registry.ensure_id("events", EntityKind::Event, 5, 0);
        let id2 = registry.ensure_id("events", EntityKind::Event, 5, 0);
        assert_eq!(id1, id2);
        assert_eq!(
            registry.get(id1),
            Some(Descriptor {
                data_key: "events".into(),
                kind: EntityKind::Event,
                time_index: 5,
                local_index: 0,
            })
        );
    }

    #[test]
    fn allocation_is_monotone_and_distinct_descriptors_get_distinct_ids() {
        let registry = EntityRegistry::new();
        let id1 = registry.ensure_id("a", EntityKind::Interval, 0, 0);
        let id2 = registry.ensure_id("a", EntityKind::Interval, 0, 1);
        assert_ne!(id1, id2);
        assert!(id2.0 > id1.0);
    }

    #[test]
    fn unknown_id_resolves_to_absent() {
        let registry = EntityRegistry::new();
        assert_eq!(registry.get(EntityId(999)), None);
    }

    #[test]
    fn dropped_registry_degrades_weak_refs_to_zero() {
        let weak = {
            let registry = EntityRegistry::new();
            registry.downgrade()
        };
        assert_eq!(weak.ensure_id("x", EntityKind::Mask, 0, 0), EntityId(0));
    }
}
