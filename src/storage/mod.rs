//! The three interchangeable storage backends shared by every series type.
//!
//! Generalized from the teacher's `StorageBackend` trait dispatch
//! (`spatio::storage::StorageBackend`) and the three-backend design
//! documented in the original `Digital_Interval_Series.hpp`: Owning,
//! View, and Lazy storage, unified behind one enum so series code never
//! has to match on backend except to materialize.

use std::rc::Rc;

/// A read-only, indexable, finite source of elements a View can reference.
pub trait SeriesSource {
    type Elem: Clone;

    fn source_len(&self) -> usize;
    fn source_get(&self, idx: usize) -> Self::Elem;
}

/// One of the three storage backends for a series of `E`.
pub enum Storage<E: Clone> {
    /// Exclusive owner of its elements, in a plain `Vec` (the
    /// Structure-of-Arrays layout lives one level up, in the series types
    /// that store parallel `Vec`s of fields rather than `Vec<E>` directly).
    Owning(Vec<E>),
    /// Zero-copy reference to another series via a vector of indices into it.
    View {
        source: Rc<dyn SeriesSource<Elem = E>>,
        indices: Vec<usize>,
    },
    /// On-demand computation from a restartable, finite producer.
    Lazy {
        produce: Rc<dyn Fn() -> Box<dyn Iterator<Item = E>>>,
        count: usize,
    },
}

impl<E: Clone> Storage<E> {
    #[must_use]
    pub fn owning(elements: Vec<E>) -> Self {
        Storage::Owning(elements)
    }

    #[must_use]
    pub fn view(source: Rc<dyn SeriesSource<Elem = E>>, indices: Vec<usize>) -> Self {
        Storage::View { source, indices }
    }

    #[must_use]
    pub fn lazy(produce: Rc<dyn Fn() -> Box<dyn Iterator<Item = E>>>, count: usize) -> Self {
        Storage::Lazy { produce, count }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Storage::Owning(v) => v.len(),
            Storage::View { indices, .. } => indices.len(),
            Storage::Lazy { count, .. } => *count,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_view(&self) -> bool {
        matches!(self, Storage::View { .. })
    }

    #[must_use]
    pub fn is_lazy(&self) -> bool {
        matches!(self, Storage::Lazy { .. })
    }

    /// Element at `idx`, computed through whichever backend this is.
    /// Panics on an out-of-bounds index, matching `Vec::get`-free indexing
    /// used internally once callers have already range-checked.
    #[must_use]
    pub fn get(&self, idx: usize) -> E {
        match self {
            Storage::Owning(v) => v[idx].clone(),
            Storage::View { source, indices } => source.source_get(indices[idx]),
            Storage::Lazy { produce, .. } => produce().nth(idx).expect("lazy index in range"),
        }
    }

    /// Fast-path slice access, available only when storage is contiguous
    /// Owning memory. `None` for View/Lazy, forcing callers through
    /// [`Storage::get`] instead.
    #[must_use]
    pub fn contiguous_cache(&self) -> Option<&[E]> {
        match self {
            Storage::Owning(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Collects every element into a fresh `Vec`, regardless of backend.
    #[must_use]
    pub fn materialize(&self) -> Vec<E> {
        match self {
            Storage::Owning(v) => v.clone(),
            Storage::View { source, indices } => {
                indices.iter().map(|&i| source.source_get(i)).collect()
            }
            Storage::Lazy { produce, count } => produce().take(*count).collect(),
        }
    }

    /// Returns the owning `Vec` if this storage is already Owning.
    #[must_use]
    pub fn as_owning_mut(&mut self) -> Option<&mut Vec<E>> {
        match self {
            Storage::Owning(v) => Some(v),
            _ => None,
        }
    }

    /// Materializes View/Lazy storage into Owning in a single explicit
    /// step, never an implicit side effect of some other call.
    pub fn materialize_in_place(&mut self) {
        if matches!(self, Storage::Owning(_)) {
            return;
        }
        let elements = self.materialize();
        *self = Storage::Owning(elements);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecSource(Vec<i32>);
    impl SeriesSource for VecSource {
        type Elem = i32;
        fn source_len(&self) -> usize {
            self.0.len()
        }
        fn source_get(&self, idx: usize) -> i32 {
            self.0[idx]
        }
    }

    #[test]
    fn owning_contiguous_cache_present() {
        let storage = Storage::owning(vec![1, 2, 3]);
        assert_eq!(storage.contiguous_cache(), Some([1, 2, 3].as_slice()));
    }

    #[test]
    fn view_has_no_contiguous_cache_but_materializes_correctly() {
        let source: Rc<dyn SeriesSource<Elem = i32>> = Rc::new(VecSource(vec![10, 20, 30, 40]));
        let storage = Storage::view(source, vec![3, 1]);
        assert!(storage.contiguous_cache().is_none());
        assert_eq!(storage.materialize(), vec![40, 20]);
        assert_eq!(storage.get(0), 40);
        assert_eq!(storage.get(1), 20);
    }

    #[test]
    fn lazy_materializes_from_producer() {
        let storage: Storage<i32> = Storage::lazy(Rc::new(|| Box::new((0..5).map(|x| x * 2))), 5);
        assert!(storage.is_lazy());
        assert_eq!(storage.materialize(), vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn materialize_in_place_converts_view_to_owning() {
        let source: Rc<dyn SeriesSource<Elem = i32>> = Rc::new(VecSource(vec![1, 2, 3]));
        let mut storage = Storage::view(source, vec![0, 1, 2]);
        storage.materialize_in_place();
        assert!(matches!(storage, Storage::Owning(_)));
        assert_eq!(storage.materialize(), vec![1, 2, 3]);
    }
}
