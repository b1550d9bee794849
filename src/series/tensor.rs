//! `TensorData`: a dense N-dimensional array recorded at each timestamp.

use std::collections::BTreeMap;

/// One dense tensor, stored flat in row-major order alongside its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl Tensor {
    #[must_use]
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }
}

/// A time-keyed map from timestamp to a tensor, all sharing one feature
/// shape for the lifetime of the container.
pub struct TensorData {
    feature_shape: Vec<usize>,
    by_time: BTreeMap<i64, Tensor>,
}

impl TensorData {
    /// Fixes the feature shape every subsequent [`Self::set`] must match.
    #[must_use]
    pub fn new(feature_shape: Vec<usize>) -> Self {
        Self {
            feature_shape,
            by_time: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn feature_shape(&self) -> &[usize] {
        &self.feature_shape
    }

    /// Records `tensor` at `time`. Silently discards a tensor whose shape
    /// doesn't match the container's feature shape, with a diagnostic, per
    /// the engine's policy for invariant-violating loader input.
    pub fn set(&mut self, time: i64, tensor: Tensor) {
        if tensor.shape != self.feature_shape {
            log::warn!(
                "discarding tensor at t={time} with shape {:?}, expected {:?}",
                tensor.shape,
                self.feature_shape
            );
            return;
        }
        self.by_time.insert(time, tensor);
    }

    #[must_use]
    pub fn at(&self, time: i64) -> Option<&Tensor> {
        self.by_time.get(&time)
    }

    #[must_use]
    pub fn times(&self) -> Vec<i64> {
        self.by_time.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_retrieve_matching_shape() {
        let mut data = TensorData::new(vec![2, 2]);
        data.set(0, Tensor::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]));
        assert_eq!(data.at(0).unwrap().data, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn mismatched_shape_is_discarded() {
        let mut data = TensorData::new(vec![2, 2]);
        data.set(0, Tensor::new(vec![3], vec![1.0, 2.0, 3.0]));
        assert!(data.at(0).is_none());
        assert!(data.is_empty());
    }
}
