//! `DigitalEventSeries`: a sorted sequence of discrete timestamped events.

use crate::entity::{EntityKind, WeakEntityRegistry};
use crate::observer::ObserverHook;
use crate::storage::{SeriesSource, Storage};
use crate::time_frame::{TimeFrame, TimeIndex};
use ethogram_types::EntityId;
use std::rc::Rc;

/// One element of a [`DigitalEventSeries`]: a timestamp (expressed as an
/// index into the series' own [`TimeFrame`], or a raw tick value if the
/// series has none attached) and its assigned entity id.
pub type EventElement = (i64, EntityId);

/// A sorted, duplicate-permitting collection of discrete events.
pub struct DigitalEventSeries {
    storage: Storage<EventElement>,
    time_frame: Option<Rc<TimeFrame>>,
    observers: ObserverHook,
    identity: WeakEntityRegistry,
    data_key: String,
}

impl SeriesSource for DigitalEventSeries {
    type Elem = EventElement;

    fn source_len(&self) -> usize {
        self.storage.len()
    }

    fn source_get(&self, idx: usize) -> EventElement {
        self.storage.get(idx)
    }
}

impl DigitalEventSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Storage::owning(Vec::new()),
            time_frame: None,
            observers: ObserverHook::new(),
            identity: WeakEntityRegistry::none(),
            data_key: String::new(),
        }
    }

    /// Builds an owning series from timestamps handed over by a loader
    /// (§6). Sorts them; entity ids start at `0` until an identity context
    /// is attached.
    #[must_use]
    pub fn from_timestamps(mut timestamps: Vec<i64>) -> Self {
        timestamps.sort_unstable();
        let elements = timestamps.into_iter().map(|t| (t, EntityId::default())).collect();
        Self {
            storage: Storage::owning(elements),
            time_frame: None,
            observers: ObserverHook::new(),
            identity: WeakEntityRegistry::none(),
            data_key: String::new(),
        }
    }

    pub fn set_time_frame(&mut self, time_frame: Rc<TimeFrame>) {
        self.time_frame = Some(time_frame);
    }

    #[must_use]
    pub fn time_frame(&self) -> Option<&Rc<TimeFrame>> {
        self.time_frame.as_ref()
    }

    pub fn set_identity_context(&mut self, data_key: impl Into<String>, identity: WeakEntityRegistry) {
        self.data_key = data_key.into();
        self.identity = identity;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn add_observer(&self, callback: std::rc::Weak<dyn Fn()>) -> crate::observer::ObserverId {
        self.observers.add_observer(callback)
    }

    pub fn remove_observer(&self, id: crate::observer::ObserverId) {
        self.observers.remove_observer(id);
    }

    /// Inserts `t`, maintaining sorted order. Duplicates are permitted.
    pub fn add_event(&mut self, t: i64, notify: bool) {
        self.materialize_in_place();
        let Storage::Owning(events) = &mut self.storage else {
            unreachable!("materialized above")
        };
        let pos = events.partition_point(|&(ts, _)| ts <= t);
        let local_index = pos;
        let id = self
            .identity
            .ensure_id(self.data_key.clone(), EntityKind::Event, t, local_index);
        events.insert(pos, (t, id));
        if notify {
            self.observers.notify();
        }
    }

    /// Removes the first occurrence of `t`; a no-op if absent.
    pub fn remove_event(&mut self, t: i64, notify: bool) {
        self.materialize_in_place();
        let Storage::Owning(events) = &mut self.storage else {
            unreachable!("materialized above")
        };
        if let Some(pos) = events.iter().position(|&(ts, _)| ts == t) {
            events.remove(pos);
            if notify {
                self.observers.notify();
            }
        }
    }

    fn materialize_in_place(&mut self) {
        self.storage.materialize_in_place();
    }

    /// A restartable, finite view of every element. Calling this again
    /// after mutating the series observes the new state.
    pub fn view(&self) -> impl Iterator<Item = EventElement> + '_ {
        (0..self.storage.len()).map(move |i| self.storage.get(i))
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

    /// Elements with `t_start <= timestamp <= t_stop`, after converting the
    /// query range from `source_frame` into this series' own frame.
    pub fn view_in_range<'a>(
        &'a self,
        t_start: TimeIndex,
        t_stop: TimeIndex,
        source_frame: &Rc<TimeFrame>,
    ) -> impl Iterator<Item = EventElement> + 'a {
        let (lo, hi) = self.converted_range(t_start, t_stop, source_frame);
        self.view().filter(move |&(ts, _)| ts >= lo && ts <= hi)
    }

    #[must_use]
    pub fn count_in_range(&self, t_start: TimeIndex, t_stop: TimeIndex, source_frame: &Rc<TimeFrame>) -> usize {
        self.view_in_range(t_start, t_stop, source_frame).count()
    }
}

impl Default for DigitalEventSeries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_event_keeps_sorted_order_with_duplicates() {
        let mut series = DigitalEventSeries::new();
        series.add_event(100, true);
        series.add_event(50, true);
        series.add_event(50, true);
        series.add_event(75, true);

        let timestamps: Vec<i64> = series.view().map(|(t, _)| t).collect();
        assert_eq!(timestamps, vec![50, 50, 75, 100]);
    }

    #[test]
    fn adjacent_elements_are_non_decreasing() {
        // property 8.1.2
        let mut series = DigitalEventSeries::from_timestamps(vec![5, 1, 3, 3, 2]);
        series.add_event(0, true);
        let timestamps: Vec<i64> = series.view().map(|(t, _)| t).collect();
        for w in timestamps.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn remove_event_drops_first_occurrence_only() {
        let mut series = DigitalEventSeries::from_timestamps(vec![1, 2, 2, 3]);
        series.remove_event(2, true);
        let timestamps: Vec<i64> = series.view().map(|(t, _)| t).collect();
        assert_eq!(timestamps, vec![1, 2, 3]);
    }

    #[test]
    fn remove_event_on_absent_value_is_noop() {
        let mut series = DigitalEventSeries::from_timestamps(vec![1, 2, 3]);
        series.remove_event(99, true);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn view_in_range_filters_inclusive_bounds() {
        let series = DigitalEventSeries::from_timestamps(vec![0, 10, 20, 30, 40]);
        let tf = TimeFrame::new(vec![0, 10, 20, 30, 40]).unwrap();
        let got: Vec<i64> = series
            .view_in_range(TimeIndex(10), TimeIndex(30), &tf)
            .map(|(t, _)| t)
            .collect();
        assert_eq!(got, vec![10, 20, 30]);
    }

    #[test]
    fn count_in_range_matches_view_in_range() {
        let series = DigitalEventSeries::from_timestamps(vec![0, 10, 20, 30]);
        let tf = TimeFrame::new(vec![0, 10, 20, 30]).unwrap();
        assert_eq!(series.count_in_range(TimeIndex(5), TimeIndex(25), &tf), 2);
    }

    #[test]
    fn out_of_range_query_returns_empty() {
        let series = DigitalEventSeries::from_timestamps(vec![10, 20]);
        let tf = TimeFrame::new(vec![10, 20]).unwrap();
        assert_eq!(series.count_in_range(TimeIndex(1000), TimeIndex(2000), &tf), 0);
    }
}
