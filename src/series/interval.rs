//! `DigitalIntervalSeries`: a coalesced set of non-overlapping, non-contiguous intervals.

use crate::config::EngineConfig;
use crate::entity::{EntityKind, WeakEntityRegistry};
use crate::error::{CoreError, Result};
use crate::observer::ObserverHook;
use crate::storage::{SeriesSource, Storage};
use crate::time_frame::{TimeFrame, TimeIndex};
use ethogram_types::interval::{contains_interval, contains_time, contiguous, overlaps};
use ethogram_types::{EntityId, Interval};
use std::rc::Rc;

/// One element of a [`DigitalIntervalSeries`].
pub type IntervalElement = (Interval, EntityId);

/// Selects how a range query treats intervals that straddle the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    /// Only intervals fully inside `[t_start, t_stop]`.
    Contained,
    /// Any interval overlapping `[t_start, t_stop]`, unclipped.
    Overlapping,
    /// Any interval overlapping `[t_start, t_stop]`, clipped to it.
    Clip,
}

/// A sorted, coalesced collection of intervals: no two stored intervals
/// overlap or touch end-to-end (§4.D-I in the engine's design notes).
pub struct DigitalIntervalSeries {
    storage: Storage<IntervalElement>,
    time_frame: Option<Rc<TimeFrame>>,
    observers: ObserverHook,
    identity: WeakEntityRegistry,
    data_key: String,
}

impl SeriesSource for DigitalIntervalSeries {
    type Elem = IntervalElement;

    fn source_len(&self) -> usize {
        self.storage.len()
    }

    fn source_get(&self, idx: usize) -> IntervalElement {
        self.storage.get(idx)
    }
}

impl DigitalIntervalSeries {
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

    /// Builds an owning, coalesced series from loader-supplied intervals
    /// (§6): reversed intervals (`start > end`) are discarded with a
    /// diagnostic, the rest folded through [`Self::add_interval`] in
    /// start order so the result is coalesced regardless of input order.
    #[must_use]
    pub fn from_intervals(mut intervals: Vec<Interval>) -> Self {
        intervals.retain(|iv| {
            let keep = !iv.is_empty();
            if !keep {
                log::warn!("discarding reversed interval {{{},{}}} from loader input", iv.start, iv.end);
            }
            keep
        });
        intervals.sort();
        let mut series = Self::new();
        for iv in intervals {
            series.add_interval(iv, false);
        }
        series
    }

    /// Loader entry point honoring [`EngineConfig::strict_validation`]: a
    /// reversed interval is a fatal `CoreError::InvariantViolation` when
    /// `config.strict_validation` is set, otherwise behaves exactly like
    /// [`Self::from_intervals`] and discards it with a diagnostic.
    pub fn from_intervals_checked(intervals: Vec<Interval>, config: &EngineConfig) -> Result<Self> {
        if config.strict_validation {
            if let Some(bad) = intervals.iter().find(|iv| iv.is_empty()) {
                return Err(CoreError::InvariantViolation(format!(
                    "reversed interval {{{},{}}}",
                    bad.start, bad.end
                )));
            }
        }
        Ok(Self::from_intervals(intervals))
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

    fn owning_snapshot(&mut self) -> Vec<IntervalElement> {
        self.storage.materialize_in_place();
        match &self.storage {
            Storage::Owning(v) => v.clone(),
            _ => unreachable!("materialized above"),
        }
    }

    /// Merges `new` into the coalesced set, dropping or absorbing every
    /// stored interval that overlaps or touches it. A single left-to-right
    /// pass suffices because the stored set is already coalesced and sorted
    /// by start: `merged` only ever grows to cover more of what follows.
    pub fn add_interval(&mut self, new: Interval, notify: bool) {
        let existing = self.owning_snapshot();

        let mut merged = new;
        let mut kept: Vec<IntervalElement> = Vec::with_capacity(existing.len());
        for (e, id) in existing {
            if contains_interval(&merged, &e) {
                continue;
            }
            if contains_interval(&e, &merged) {
                return;
            }
            if overlaps(&e, &merged) || contiguous(&e, &merged) {
                merged = Interval::new(merged.start.min(e.start), merged.end.max(e.end));
                continue;
            }
            kept.push((e, id));
        }

        kept.push((merged, EntityId::default()));
        kept.sort_by_key(|(iv, _)| *iv);

        let merged_pos = kept
            .iter()
            .position(|(iv, _)| *iv == merged)
            .expect("merged interval present in kept set");
        kept[merged_pos].1 = self
            .identity
            .ensure_id(self.data_key.clone(), EntityKind::Interval, merged.start, merged_pos);

        self.storage = Storage::owning(kept);
        if notify {
            self.observers.notify();
        }
    }

    /// Point removal (§4.D-III): finds the unique stored interval
    /// containing `t` and shrinks, splits, or deletes it.
    pub fn remove_event(&mut self, t: i64, notify: bool) {
        let existing = self.owning_snapshot();
        let Some(pos) = existing.iter().position(|(e, _)| contains_time(e, t)) else {
            return;
        };
        let (e, id) = existing[pos];

        let mut result = existing;
        result.remove(pos);
        if e.start == t && e.end == t {
            // deleted entirely
        } else if t == e.start {
            result.insert(pos, (Interval::new(t + 1, e.end), id));
        } else if t == e.end {
            result.insert(pos, (Interval::new(e.start, t - 1), id));
        } else {
            let left_id = id;
            let right_id =
                self.identity
                    .ensure_id(self.data_key.clone(), EntityKind::Interval, t + 1, pos + 1);
            result.insert(pos, (Interval::new(t + 1, e.end), right_id));
            result.insert(pos, (Interval::new(e.start, t - 1), left_id));
        }

        self.storage = Storage::owning(result);
        if notify {
            self.observers.notify();
        }
    }

    /// Removes every stored interval structurally equal to one in `batch`.
    /// Matches by exact `{start, end}` equality, not by overlap: a batch
    /// entry `{100,200}` never removes a stored `{100,210}`.
    pub fn remove_intervals(&mut self, batch: &[Interval], notify: bool) {
        let existing = self.owning_snapshot();
        let result: Vec<IntervalElement> = existing.into_iter().filter(|(iv, _)| !batch.contains(iv)).collect();
        self.storage = Storage::owning(result);
        if notify {
            self.observers.notify();
        }
    }

    pub fn remove_interval(&mut self, iv: Interval, notify: bool) {
        self.remove_intervals(std::slice::from_ref(&iv), notify);
    }

    /// A restartable, finite view of every stored element.
    pub fn view(&self) -> impl Iterator<Item = IntervalElement> + '_ {
        (0..self.storage.len()).map(move |i| self.storage.get(i))
    }

    fn converted_range(&self, t_start: TimeIndex, t_stop: TimeIndex, source_frame: &Rc<TimeFrame>) -> Interval {
        match &self.time_frame {
            Some(own) if !Rc::ptr_eq(own, source_frame) => {
                let (s, e) = TimeFrame::convert_range(t_start, t_stop, source_frame, own);
                Interval::new(s.value(), e.value())
            }
            _ => Interval::new(t_start.value(), t_stop.value()),
        }
    }

    /// Range query (§4.D-V), after converting `[t_start, t_stop]` from
    /// `source_frame` into this series' own frame.
    #[must_use]
    pub fn view_in_range(
        &self,
        t_start: TimeIndex,
        t_stop: TimeIndex,
        source_frame: &Rc<TimeFrame>,
        mode: RangeMode,
    ) -> Vec<IntervalElement> {
        let query = self.converted_range(t_start, t_stop, source_frame);
        self.view()
            .filter_map(|(iv, id)| match mode {
                RangeMode::Contained => (query.start <= iv.start && iv.end <= query.end).then_some((iv, id)),
                RangeMode::Overlapping => overlaps(&iv, &query).then_some((iv, id)),
                RangeMode::Clip => overlaps(&iv, &query)
                    .then(|| (Interval::new(iv.start.max(query.start), iv.end.min(query.end)), id)),
            })
            .collect()
    }

    #[must_use]
    pub fn find_by_entity(&self, id: EntityId) -> Option<Interval> {
        self.view().find(|(_, eid)| *eid == id).map(|(iv, _)| iv)
    }
}

impl Default for DigitalIntervalSeries {
    fn default() -> Self {
        Self::new()
    }
}

/// Scans a dense boolean mask for `true` runs, emitting one [`Interval`]
/// per run in frame-index coordinates starting at `offset`. Shared by
/// [`DigitalIntervalSeries::create_intervals_from_bool`] and the boolean
/// algebra operator's output-construction step.
#[must_use]
pub fn intervals_from_bool(bits: &[bool], offset: i64) -> Vec<Interval> {
    let mut runs = Vec::new();
    let mut run_start: Option<i64> = None;
    for (i, &bit) in bits.iter().enumerate() {
        let tick = offset + i as i64;
        match (bit, run_start) {
            (true, None) => run_start = Some(tick),
            (false, Some(start)) => {
                runs.push(Interval::new(start, tick - 1));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push(Interval::new(start, offset + bits.len() as i64 - 1));
    }
    runs
}

impl DigitalIntervalSeries {
    /// Builds a fresh owning series from a dense boolean mask, one interval
    /// per contiguous run of `true`.
    #[must_use]
    pub fn create_intervals_from_bool(bits: &[bool], offset: i64) -> Self {
        Self::from_intervals(intervals_from_bool(bits, offset))
    }
}
