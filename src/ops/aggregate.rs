//! Cross-series tabular aggregation into a dense matrix.
//!
//! Grounded on the original `DataAggregation.cpp`/`.hpp`: each output column
//! is one `TransformationType` evaluated per row interval against an
//! optional named reference collection. A missing reference key always
//! yields `NaN`; `IntervalCount` is the one transformation where a *present*
//! reference with zero overlaps still yields `0.0`, since "how many" has a
//! well-defined answer even when it's none, unlike `IntervalId`, which has
//! no index to report in that case.

use crate::error::{CoreError, Result};
use crate::series::analog::{mean_of, std_dev_of};
use crate::series::{AnalogTimeSeries, DigitalIntervalSeries, PointData};
use ethogram_types::interval::{overlap_duration, overlaps};
use ethogram_types::Interval;
use rustc_hash::FxHashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformationType {
    Start,
    End,
    Duration,
    IntervalId,
    IntervalCount,
    AnalogMean,
    AnalogMin,
    AnalogMax,
    AnalogStdDev,
    PointMeanX,
    PointMeanY,
}

impl FromStr for TransformationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "duration" => Ok(Self::Duration),
            "interval_id" => Ok(Self::IntervalId),
            "interval_count" => Ok(Self::IntervalCount),
            "analog_mean" => Ok(Self::AnalogMean),
            "analog_min" => Ok(Self::AnalogMin),
            "analog_max" => Ok(Self::AnalogMax),
            "analog_std_dev" => Ok(Self::AnalogStdDev),
            "point_mean_x" => Ok(Self::PointMeanX),
            "point_mean_y" => Ok(Self::PointMeanY),
            other => Err(CoreError::UnknownTransformation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapStrategy {
    First,
    Last,
    MaxOverlap,
}

impl FromStr for OverlapStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "max_overlap" => Ok(Self::MaxOverlap),
            other => Err(CoreError::UnknownOverlapStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnConfig {
    pub transformation: TransformationType,
    pub column_name: String,
    pub reference_key: Option<String>,
    pub overlap_strategy: Option<OverlapStrategy>,
}

/// One of the collection kinds a column's `reference_key` may point at.
pub enum Reference<'a> {
    Intervals(&'a DigitalIntervalSeries),
    Analog(&'a AnalogTimeSeries),
    Points(&'a PointData),
}

#[derive(Default)]
pub struct References<'a> {
    entries: FxHashMap<String, Reference<'a>>,
}

impl<'a> References<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, reference: Reference<'a>) {
        self.entries.insert(key.into(), reference);
    }

    #[must_use]
    fn get(&self, key: &str) -> Option<&Reference<'a>> {
        self.entries.get(key)
    }
}

fn validate_column(column: &ColumnConfig) -> Result<()> {
    use TransformationType::{AnalogMax, AnalogMean, AnalogMin, AnalogStdDev, IntervalCount, IntervalId, PointMeanX, PointMeanY};
    let needs_reference = matches!(
        column.transformation,
        IntervalId | IntervalCount | AnalogMean | AnalogMin | AnalogMax | AnalogStdDev | PointMeanX | PointMeanY
    );
    if needs_reference && column.reference_key.is_none() {
        return Err(CoreError::InvalidConfig(format!(
            "column '{}' requires a reference_key",
            column.column_name
        )));
    }
    if column.transformation == IntervalId && column.overlap_strategy.is_none() {
        return Err(CoreError::InvalidConfig(format!(
            "column '{}' (IntervalId) requires an overlap_strategy",
            column.column_name
        )));
    }
    Ok(())
}

/// `{First, Last, MaxOverlap}` index selection among reference intervals
/// overlapping `row`. `MaxOverlap` ties break to the first occurrence,
/// matching every other tie-break in this engine.
#[must_use]
fn find_overlapping_interval_index(row: Interval, refs: &[Interval], strategy: OverlapStrategy) -> Option<usize> {
    match strategy {
        OverlapStrategy::First => refs.iter().position(|r| overlaps(&row, r)),
        OverlapStrategy::Last => refs.iter().rposition(|r| overlaps(&row, r)),
        OverlapStrategy::MaxOverlap => {
            let mut best: Option<(usize, i64)> = None;
            for (idx, r) in refs.iter().enumerate() {
                let duration = overlap_duration(&row, r);
                if duration <= 0 {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((_, best_duration)) => duration > best_duration,
                };
                if better {
                    best = Some((idx, duration));
                }
            }
            best.map(|(idx, _)| idx)
        }
    }
}

fn apply_transformation(row: Interval, column: &ColumnConfig, references: &References) -> f64 {
    use TransformationType::{AnalogMax, AnalogMean, AnalogMin, AnalogStdDev, Duration, End, IntervalCount, IntervalId, PointMeanX, PointMeanY, Start};

    match column.transformation {
        Start => row.start as f64,
        End => row.end as f64,
        Duration => row.duration() as f64,
        IntervalId => {
            let Some(Reference::Intervals(refs)) = column.reference_key.as_deref().and_then(|k| references.get(k)) else {
                return f64::NAN;
            };
            let strategy = column.overlap_strategy.expect("validated at config time");
            let ref_intervals: Vec<Interval> = refs.view().map(|(iv, _)| iv).collect();
            find_overlapping_interval_index(row, &ref_intervals, strategy).map_or(f64::NAN, |idx| idx as f64)
        }
        IntervalCount => {
            let Some(Reference::Intervals(refs)) = column.reference_key.as_deref().and_then(|k| references.get(k)) else {
                return f64::NAN;
            };
            refs.view().filter(|(iv, _)| overlaps(iv, &row)).count() as f64
        }
        AnalogMean | AnalogMin | AnalogMax | AnalogStdDev => {
            let Some(Reference::Analog(analog)) = column.reference_key.as_deref().and_then(|k| references.get(k)) else {
                return f64::NAN;
            };
            let values: Vec<f64> = analog.samples_in_raw_range(row.start, row.end).map(|(_, v)| v as f64).collect();
            match column.transformation {
                AnalogMean => mean_of(&values),
                AnalogMin => values.iter().copied().fold(f64::NAN, |acc, v| if acc.is_nan() { v } else { acc.min(v) }),
                AnalogMax => values.iter().copied().fold(f64::NAN, |acc, v| if acc.is_nan() { v } else { acc.max(v) }),
                AnalogStdDev => std_dev_of(&values),
                _ => unreachable!(),
            }
        }
        PointMeanX | PointMeanY => {
            let Some(Reference::Points(points)) = column.reference_key.as_deref().and_then(|k| references.get(k)) else {
                return f64::NAN;
            };
            let pts = points.points_in_range(row.start, row.end);
            if pts.is_empty() {
                return f64::NAN;
            }
            let coords: Vec<f64> = pts
                .iter()
                .map(|p| if column.transformation == PointMeanX { p.x() as f64 } else { p.y() as f64 })
                .collect();
            mean_of(&coords)
        }
    }
}

/// Builds the dense `rows x columns` matrix. Fails fast (before evaluating
/// any row) if any column's configuration is inconsistent. An unknown
/// `TransformationType`/`OverlapStrategy` string is already rejected at
/// parse time by [`TransformationType::from_str`]/[`OverlapStrategy::from_str`];
/// this additionally checks that each column carries the reference/strategy
/// its transformation needs.
pub fn aggregate_data(row_intervals: &[Interval], columns: &[ColumnConfig], references: &References) -> Result<Vec<Vec<f64>>> {
    for column in columns {
        validate_column(column)?;
    }
    Ok(row_intervals
        .iter()
        .map(|&row| columns.iter().map(|column| apply_transformation(row, column, references)).collect())
        .collect())
}
