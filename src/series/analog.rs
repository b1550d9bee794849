//! `AnalogTimeSeries`: floating-point samples at explicit timestamps.

use crate::config::EngineConfig;
use crate::error::{CoreError, Result};
use crate::storage::{SeriesSource, Storage};
use crate::time_frame::{TimeFrame, TimeIndex};
use std::rc::Rc;

/// One sample: `(timestamp, value)`. Timestamps need not align to any
/// TimeFrame's index grid, since the series is free-floating, "sparse" data.
pub type AnalogSample = (i64, f32);

pub struct AnalogTimeSeries {
    storage: Storage<AnalogSample>,
    time_frame: Option<Rc<TimeFrame>>,
}

impl SeriesSource for AnalogTimeSeries {
    type Elem = AnalogSample;

    fn source_len(&self) -> usize {
        self.storage.len()
    }

    fn source_get(&self, idx: usize) -> AnalogSample {
        self.storage.get(idx)
    }
}

impl AnalogTimeSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Storage::owning(Vec::new()),
            time_frame: None,
        }
    }

    /// Builds an owning series from loader-supplied parallel arrays (§6).
    /// Sorts by `times` if not already sorted; `values.len() != times.len()`
    /// truncates to the shorter length with a diagnostic, matching the
    /// taxonomy's "invariant-violating input" handling.
    #[must_use]
    pub fn from_parallel(times: Vec<i64>, values: Vec<f32>) -> Self {
        let (times, values) = if times.len() == values.len() {
            (times, values)
        } else {
            log::warn!(
                "analog loader supplied mismatched lengths (times={}, values={}); truncating",
                times.len(),
                values.len()
            );
            let n = times.len().min(values.len());
            (times[..n].to_vec(), values[..n].to_vec())
        };
        let mut samples: Vec<AnalogSample> = times.into_iter().zip(values).collect();
        samples.sort_by_key(|&(t, _)| t);
        Self {
            storage: Storage::owning(samples),
            time_frame: None,
        }
    }

    /// Loader entry point honoring [`EngineConfig::strict_validation`]:
    /// mismatched `times`/`values` lengths are a fatal
    /// `CoreError::InvariantViolation` when `config.strict_validation` is
    /// set, otherwise behaves exactly like [`Self::from_parallel`] and
    /// truncates to the shorter length with a diagnostic.
    pub fn from_parallel_checked(times: Vec<i64>, values: Vec<f32>, config: &EngineConfig) -> Result<Self> {
        if config.strict_validation && times.len() != values.len() {
            return Err(CoreError::InvariantViolation(format!(
                "mismatched lengths: times={}, values={}",
                times.len(),
                values.len()
            )));
        }
        Ok(Self::from_parallel(times, values))
    }

    pub fn set_time_frame(&mut self, time_frame: Rc<TimeFrame>) {
        self.time_frame = Some(time_frame);
    }

    #[must_use]
    pub fn time_frame(&self) -> Option<&Rc<TimeFrame>> {
        self.time_frame.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> Vec<f32> {
        self.storage.materialize().into_iter().map(|(_, v)| v).collect()
    }

    #[must_use]
    pub fn times(&self) -> Vec<i64> {
        self.storage.materialize().into_iter().map(|(t, _)| t).collect()
    }

    fn converted_range(&self, t_start: TimeIndex, t_stop: TimeIndex, source_frame: &Rc<TimeFrame>) -> (i64, i64) {
        match &self.time_frame {
            Some(own) if !Rc::ptr_eq(own, source_frame) => {
                let (s, e) = TimeFrame::convert_range(t_start, t_stop, source_frame, own);
                (s.value(), e.value())
            }
            _ => (t_start.value(), t_stop.value()),
        }
    }

    /// Samples located by timestamp, not array position, with
    /// `t_start <= timestamp <= t_stop` after frame conversion.
    pub fn value_in_range<'a>(
        &'a self,
        t_start: TimeIndex,
        t_stop: TimeIndex,
        source_frame: &Rc<TimeFrame>,
    ) -> impl Iterator<Item = AnalogSample> + 'a {
        let (lo, hi) = self.converted_range(t_start, t_stop, source_frame);
        (0..self.storage.len())
            .map(move |i| self.storage.get(i))
            .filter(move |&(t, _)| t >= lo && t <= hi)
    }

    /// Samples with `lo <= timestamp <= hi`, in the series' own timestamp
    /// coordinates directly (used internally by operators that have
    /// already performed frame conversion themselves).
    pub fn samples_in_raw_range<'a>(&'a self, lo: i64, hi: i64) -> impl Iterator<Item = AnalogSample> + 'a {
        (0..self.storage.len())
            .map(move |i| self.storage.get(i))
            .filter(move |&(t, _)| t >= lo && t <= hi)
    }

    #[must_use]
    pub fn mean(&self, t_start: TimeIndex, t_stop: TimeIndex, source_frame: &Rc<TimeFrame>) -> f64 {
        let values: Vec<f64> = self
            .value_in_range(t_start, t_stop, source_frame)
            .map(|(_, v)| v as f64)
            .collect();
        mean_of(&values)
    }

    #[must_use]
    pub fn min(&self, t_start: TimeIndex, t_stop: TimeIndex, source_frame: &Rc<TimeFrame>) -> f64 {
        self.value_in_range(t_start, t_stop, source_frame)
            .map(|(_, v)| v as f64)
            .fold(f64::NAN, |acc, v| if acc.is_nan() { v } else { acc.min(v) })
    }

    #[must_use]
    pub fn max(&self, t_start: TimeIndex, t_stop: TimeIndex, source_frame: &Rc<TimeFrame>) -> f64 {
        self.value_in_range(t_start, t_stop, source_frame)
            .map(|(_, v)| v as f64)
            .fold(f64::NAN, |acc, v| if acc.is_nan() { v } else { acc.max(v) })
    }

    /// Population standard deviation. NaN for an empty range.
    #[must_use]
    pub fn std_dev(&self, t_start: TimeIndex, t_stop: TimeIndex, source_frame: &Rc<TimeFrame>) -> f64 {
        let values: Vec<f64> = self
            .value_in_range(t_start, t_stop, source_frame)
            .map(|(_, v)| v as f64)
            .collect();
        std_dev_of(&values)
    }
}

impl Default for AnalogTimeSeries {
    fn default() -> Self {
        Self::new()
    }
}

#[must_use]
pub(crate) fn mean_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[must_use]
pub(crate) fn std_dev_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mean = mean_of(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_loader_truncates_mismatched_lengths_by_default() {
        let config = EngineConfig::default();
        let series = AnalogTimeSeries::from_parallel_checked(vec![1, 2, 3], vec![10.0, 20.0], &config).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn checked_loader_rejects_mismatched_lengths_under_strict_validation() {
        let config = EngineConfig::default().with_strict_validation(true);
        let err = AnalogTimeSeries::from_parallel_checked(vec![1, 2, 3], vec![10.0, 20.0], &config).unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation(_)));
    }

    #[test]
    fn from_parallel_sorts_by_time() {
        let series = AnalogTimeSeries::from_parallel(vec![30, 10, 20], vec![3.0, 1.0, 2.0]);
        assert_eq!(series.times(), vec![10, 20, 30]);
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_parallel_truncates_on_mismatched_lengths() {
        let series = AnalogTimeSeries::from_parallel(vec![1, 2, 3], vec![10.0, 20.0]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn value_in_range_locates_by_timestamp_not_position() {
        let series = AnalogTimeSeries::from_parallel(vec![0, 100, 200, 300], vec![1.0, 2.0, 3.0, 4.0]);
        let tf = TimeFrame::new(vec![0, 100, 200, 300]).unwrap();
        let got: Vec<f32> = series
            .value_in_range(TimeIndex(100), TimeIndex(250), &tf)
            .map(|(_, v)| v)
            .collect();
        assert_eq!(got, vec![2.0, 3.0]);
    }

    #[test]
    fn aggregates_match_expected_values() {
        let series = AnalogTimeSeries::from_parallel(vec![0, 1, 2, 3], vec![1.0, 2.0, 3.0, 4.0]);
        let tf = TimeFrame::new(vec![0, 1, 2, 3]).unwrap();
        assert_eq!(series.mean(TimeIndex(0), TimeIndex(3), &tf), 2.5);
        assert_eq!(series.min(TimeIndex(0), TimeIndex(3), &tf), 1.0);
        assert_eq!(series.max(TimeIndex(0), TimeIndex(3), &tf), 4.0);
        let variance = ((1.5f64).powi(2) + (0.5f64).powi(2) + (0.5f64).powi(2) + (1.5f64).powi(2)) / 4.0;
        assert!((series.std_dev(TimeIndex(0), TimeIndex(3), &tf) - variance.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn empty_range_yields_nan_aggregates() {
        let series = AnalogTimeSeries::from_parallel(vec![0, 100], vec![1.0, 2.0]);
        let tf = TimeFrame::new(vec![0, 100]).unwrap();
        assert!(series.mean(TimeIndex(1000), TimeIndex(2000), &tf).is_nan());
        assert!(series.std_dev(TimeIndex(1000), TimeIndex(2000), &tf).is_nan());
    }
}
