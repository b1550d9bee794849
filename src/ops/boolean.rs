//! Interval boolean algebra: AND / OR / XOR / NOT / AND_NOT.
//!
//! Grounded on the original `DigitalIntervalBoolean.cpp`: align the second
//! operand onto the first's TimeFrame, materialize both as dense boolean
//! arrays over their combined bounding range, compose pointwise, then scan
//! the result back into coalesced runs. `O(hi-lo+1)`, fine for the sparse,
//! frame-aligned behavioral intervals this operates on.

use crate::error::{CoreError, Result};
use crate::series::interval::intervals_from_bool;
use crate::series::DigitalIntervalSeries;
use crate::time_frame::TimeFrame;
use crate::time_frame::TimeIndex;
use ethogram_types::Interval;
use std::rc::Rc;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Xor,
    Not,
    AndNot,
}

impl FromStr for BooleanOp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "and" => Ok(BooleanOp::And),
            "or" => Ok(BooleanOp::Or),
            "xor" => Ok(BooleanOp::Xor),
            "not" => Ok(BooleanOp::Not),
            "and_not" => Ok(BooleanOp::AndNot),
            other => Err(CoreError::UnknownBooleanOperation(other.to_string())),
        }
    }
}

fn align_to(iv: Interval, source_frame: Option<&Rc<TimeFrame>>, target_frame: Option<&Rc<TimeFrame>>) -> Interval {
    match (source_frame, target_frame) {
        (Some(sf), Some(tf)) if !Rc::ptr_eq(sf, tf) => {
            let t_start = sf.time_at(TimeIndex(iv.start));
            let t_end = sf.time_at(TimeIndex(iv.end));
            Interval::new(tf.index_at(t_start, false).value(), tf.index_at(t_end, true).value())
        }
        _ => iv,
    }
}

/// Sets every slot covered by `iv` (in `lo`-relative coordinates) to `true`.
/// Callers guarantee `iv` falls within `[lo, lo + mask.len() - 1]` since `lo`
/// and the mask length are derived from the union of all intervals marked.
fn mark(mask: &mut [bool], iv: Interval, lo: i64) {
    let start = (iv.start - lo) as usize;
    let end = (iv.end - lo) as usize;
    mask[start..=end].fill(true);
}

fn build_series(mask: &[bool], lo: i64, frame: Option<&Rc<TimeFrame>>) -> DigitalIntervalSeries {
    let mut series = DigitalIntervalSeries::from_intervals(intervals_from_bool(mask, lo));
    if let Some(f) = frame {
        series.set_time_frame(f.clone());
    }
    series
}

/// Runs `op` over `a` and `b` (ignored for `Not`), per §4.D-IV.
#[must_use]
pub fn digital_interval_boolean(a: &DigitalIntervalSeries, b: &DigitalIntervalSeries, op: BooleanOp) -> DigitalIntervalSeries {
    let a_ivs: Vec<Interval> = a.view().map(|(iv, _)| iv).collect();

    if op == BooleanOp::Not {
        if a_ivs.is_empty() {
            return DigitalIntervalSeries::new();
        }
        let lo = a_ivs.iter().map(|iv| iv.start).min().unwrap();
        let hi = a_ivs.iter().map(|iv| iv.end).max().unwrap();
        let mut mask = vec![false; (hi - lo + 1) as usize];
        for iv in &a_ivs {
            mark(&mut mask, *iv, lo);
        }
        for bit in &mut mask {
            *bit = !*bit;
        }
        return build_series(&mask, lo, a.time_frame());
    }

    let b_aligned: Vec<Interval> = b.view().map(|(iv, _)| align_to(iv, b.time_frame(), a.time_frame())).collect();

    let endpoints: Vec<i64> = a_ivs.iter().chain(b_aligned.iter()).flat_map(|iv| [iv.start, iv.end]).collect();
    if endpoints.is_empty() {
        return DigitalIntervalSeries::new();
    }
    let lo = *endpoints.iter().min().unwrap();
    let hi = *endpoints.iter().max().unwrap();
    let len = (hi - lo + 1) as usize;

    let mut mask_a = vec![false; len];
    let mut mask_b = vec![false; len];
    for iv in &a_ivs {
        mark(&mut mask_a, *iv, lo);
    }
    for iv in &b_aligned {
        mark(&mut mask_b, *iv, lo);
    }

    let combined: Vec<bool> = mask_a
        .iter()
        .zip(mask_b.iter())
        .map(|(&x, &y)| match op {
            BooleanOp::And => x && y,
            BooleanOp::Or => x || y,
            BooleanOp::Xor => x ^ y,
            BooleanOp::AndNot => x && !y,
            BooleanOp::Not => unreachable!("handled above"),
        })
        .collect();

    build_series(&combined, lo, a.time_frame())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_from(pairs: &[(i64, i64)]) -> DigitalIntervalSeries {
        DigitalIntervalSeries::from_intervals(pairs.iter().map(|&(s, e)| Interval::new(s, e)).collect())
    }

    fn stored(series: &DigitalIntervalSeries) -> Vec<Interval> {
        series.view().map(|(iv, _)| iv).collect()
    }

    #[test]
    fn s2_boolean_and_or_xor_and_not() {
        let a = series_from(&[(1, 5), (10, 15)]);
        let b = series_from(&[(3, 7), (12, 20)]);

        assert_eq!(stored(&digital_interval_boolean(&a, &b, BooleanOp::And)), vec![Interval::new(3, 5), Interval::new(12, 15)]);
        assert_eq!(stored(&digital_interval_boolean(&a, &b, BooleanOp::Or)), vec![Interval::new(1, 7), Interval::new(10, 20)]);
        assert_eq!(
            stored(&digital_interval_boolean(&a, &b, BooleanOp::Xor)),
            vec![Interval::new(1, 2), Interval::new(6, 7), Interval::new(10, 11), Interval::new(16, 20)]
        );
        assert_eq!(stored(&digital_interval_boolean(&a, &b, BooleanOp::AndNot)), vec![Interval::new(1, 2), Interval::new(10, 11)]);
    }

    #[test]
    fn property_xor_self_is_empty_and_or_self_is_self() {
        let a = series_from(&[(0, 10), (20, 30)]);
        assert!(stored(&digital_interval_boolean(&a, &a, BooleanOp::Xor)).is_empty());
        assert_eq!(stored(&digital_interval_boolean(&a, &a, BooleanOp::Or)), stored(&a));
        assert_eq!(stored(&digital_interval_boolean(&a, &a, BooleanOp::And)), stored(&a));
        assert!(stored(&digital_interval_boolean(&a, &a, BooleanOp::AndNot)).is_empty());
    }

    #[test]
    fn property_double_not_restores_a_within_its_covering_range() {
        let a = series_from(&[(0, 10), (20, 30)]);
        let empty = DigitalIntervalSeries::new();
        let not_a = digital_interval_boolean(&a, &empty, BooleanOp::Not);
        let not_not_a = digital_interval_boolean(&not_a, &empty, BooleanOp::Not);
        assert_eq!(stored(&not_not_a), stored(&a));
    }

    #[test]
    fn unknown_operation_string_is_rejected() {
        assert!(matches!("frobnicate".parse::<BooleanOp>(), Err(CoreError::UnknownBooleanOperation(_))));
        assert_eq!("and".parse::<BooleanOp>().unwrap(), BooleanOp::And);
    }

    #[test]
    fn not_on_empty_a_is_empty() {
        let empty = DigitalIntervalSeries::new();
        assert!(stored(&digital_interval_boolean(&empty, &empty, BooleanOp::Not)).is_empty());
    }
}
