//! Analog interval-peak operator: one extremum event per search range.
//!
//! Grounded on the original `AnalogIntervalPeak.cpp`: `between_starts`
//! range construction, first-occurrence tie-breaking (deliberately not
//! `Iterator::max_by`/`min_by`, which keep the *last* maximal element), and
//! the same coarse progress-milestone schedule.

use crate::context::ComputeContext;
use crate::series::{AnalogTimeSeries, DigitalEventSeries, DigitalIntervalSeries};
use crate::time_frame::{TimeFrame, TimeIndex};
use ethogram_types::Interval;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakType {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    WithinIntervals,
    BetweenStarts,
}

#[derive(Debug, Clone, Copy)]
pub struct PeakParams {
    pub peak_type: PeakType,
    pub search_mode: SearchMode,
}

fn build_search_ranges(intervals: &[Interval], mode: SearchMode) -> Vec<Interval> {
    match mode {
        SearchMode::WithinIntervals => intervals.to_vec(),
        SearchMode::BetweenStarts => {
            let mut ranges = Vec::with_capacity(intervals.len());
            for pair in intervals.windows(2) {
                ranges.push(Interval::new(pair[0].start, pair[1].start - 1));
            }
            if let Some(last) = intervals.last() {
                ranges.push(Interval::new(last.start, last.end));
            }
            ranges
        }
    }
}

/// Converts a search range expressed in `i_frame`'s indices into a raw
/// timestamp range usable against `a_frame`'s samples.
fn align_range_to_analog(range: Interval, i_frame: Option<&Rc<TimeFrame>>, a_frame: Option<&Rc<TimeFrame>>) -> (i64, i64) {
    match (i_frame, a_frame) {
        (Some(i_fr), Some(a_fr)) if !Rc::ptr_eq(i_fr, a_fr) => {
            let (s, e) = TimeFrame::convert_range(TimeIndex(range.start), TimeIndex(range.end), i_fr, a_fr);
            (a_fr.time_at(s), a_fr.time_at(e))
        }
        _ => (range.start, range.end),
    }
}

/// First occurrence wins on ties: a sample only replaces the current best
/// when it is *strictly* better, never on equality.
fn find_peak(samples: &[(i64, f32)], peak_type: PeakType) -> Option<(i64, f32)> {
    let mut best: Option<(i64, f32)> = None;
    for &(t, v) in samples {
        let replace = match best {
            None => true,
            Some((_, bv)) => match peak_type {
                PeakType::Max => v > bv,
                PeakType::Min => v < bv,
            },
        };
        if replace {
            best = Some((t, v));
        }
    }
    best
}

/// Runs the operator, emitting one event per search range that contains at
/// least one sample. Cooperative with `ctx`: checked for cancellation
/// before every range, reporting milestones at 0, 10, 15, per-range, 100.
#[must_use]
pub fn analog_interval_peak(
    intervals: &DigitalIntervalSeries,
    analog: &AnalogTimeSeries,
    params: PeakParams,
    ctx: &mut ComputeContext,
) -> DigitalEventSeries {
    ctx.report_progress(0);
    let source_intervals: Vec<Interval> = intervals.view().map(|(iv, _)| iv).collect();
    let mut out = DigitalEventSeries::new();
    if source_intervals.is_empty() {
        ctx.report_progress(100);
        return out;
    }
    ctx.report_progress(10);

    let ranges = build_search_ranges(&source_intervals, params.search_mode);
    ctx.report_progress(15);

    let total = ranges.len().max(1);
    for (idx, range) in ranges.into_iter().enumerate() {
        if ctx.is_cancelled() {
            break;
        }
        let (lo, hi) = align_range_to_analog(range, intervals.time_frame(), analog.time_frame());
        let samples: Vec<(i64, f32)> = analog.samples_in_raw_range(lo, hi).collect();
        if let Some((peak_time, _)) = find_peak(&samples, params.peak_type) {
            let event_time = match intervals.time_frame() {
                Some(frame) => frame.index_at(peak_time, false).value(),
                None => peak_time,
            };
            out.add_event(event_time, false);
        }
        let milestone = (15 + (idx + 1) * 80 / total).min(100);
        ctx.report_progress(milestone as u8);
    }
    ctx.report_progress(100);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(series: &DigitalEventSeries) -> Vec<i64> {
        series.view().map(|(t, _)| t).collect()
    }

    #[test]
    fn within_intervals_finds_max_per_interval_with_first_occurrence_tiebreak() {
        let intervals = DigitalIntervalSeries::from_intervals(vec![Interval::new(0, 4), Interval::new(10, 14)]);
        let analog = AnalogTimeSeries::from_parallel(
            vec![0, 1, 2, 3, 4, 10, 11, 12, 13, 14],
            vec![1.0, 5.0, 5.0, 2.0, 0.0, 9.0, 9.0, 1.0, 1.0, 1.0],
        );
        let mut ctx = ComputeContext::new();
        let out = analog_interval_peak(
            &intervals,
            &analog,
            PeakParams {
                peak_type: PeakType::Max,
                search_mode: SearchMode::WithinIntervals,
            },
            &mut ctx,
        );
        // ties at value 5.0 (t=1,2) and 9.0 (t=10,11) both break to the earlier timestamp
        assert_eq!(events(&out), vec![1, 10]);
    }

    #[test]
    fn between_starts_builds_gap_ranges_plus_final_interval() {
        let intervals = DigitalIntervalSeries::from_intervals(vec![Interval::new(0, 2), Interval::new(10, 12), Interval::new(20, 22)]);
        let analog = AnalogTimeSeries::from_parallel(vec![0, 5, 10, 15, 20, 22], vec![1.0, 2.0, 1.0, 3.0, 1.0, 4.0]);
        let mut ctx = ComputeContext::new();
        let out = analog_interval_peak(
            &intervals,
            &analog,
            PeakParams {
                peak_type: PeakType::Max,
                search_mode: SearchMode::BetweenStarts,
            },
            &mut ctx,
        );
        // ranges: [0,9] -> argmax at t=5 (2.0); [10,19] -> argmax at t=15 (3.0); [20,22] (final) -> argmax at t=22 (4.0)
        assert_eq!(events(&out), vec![5, 15, 22]);
    }

    #[test]
    fn range_with_no_samples_emits_no_event() {
        let intervals = DigitalIntervalSeries::from_intervals(vec![Interval::new(100, 110)]);
        let analog = AnalogTimeSeries::from_parallel(vec![0, 1, 2], vec![1.0, 2.0, 3.0]);
        let mut ctx = ComputeContext::new();
        let out = analog_interval_peak(
            &intervals,
            &analog,
            PeakParams {
                peak_type: PeakType::Max,
                search_mode: SearchMode::WithinIntervals,
            },
            &mut ctx,
        );
        assert!(events(&out).is_empty());
    }

    #[test]
    fn cancellation_stops_after_current_range() {
        let intervals = DigitalIntervalSeries::from_intervals(vec![Interval::new(0, 1), Interval::new(10, 11), Interval::new(20, 21)]);
        let analog = AnalogTimeSeries::from_parallel(vec![0, 1, 10, 11, 20, 21], vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let calls = std::cell::Cell::new(0);
        let mut ctx = ComputeContext::new().with_cancellation(move || {
            calls.set(calls.get() + 1);
            calls.get() > 1
        });
        let out = analog_interval_peak(
            &intervals,
            &analog,
            PeakParams {
                peak_type: PeakType::Max,
                search_mode: SearchMode::WithinIntervals,
            },
            &mut ctx,
        );
        assert_eq!(events(&out).len(), 1);
    }
}
