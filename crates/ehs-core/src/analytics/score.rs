//! Per-record safety score.
//!
//! ```text
//! raw = 100 - 2*first_aid - 3*near_miss - max(0, ptw_issued - ptw_closed)
//!           + 2*training + tbt
//! score = clamp(raw, 0, 100)
//! ```

use super::domain::MetricRecord;

pub const MAX_SCORE: i64 = 100;
pub const MIN_SCORE: i64 = 0;

const FIRST_AID_PENALTY: i64 = 2;
const NEAR_MISS_PENALTY: i64 = 3;
const OPEN_PERMIT_PENALTY: i64 = 1;
const TRAINING_BONUS: i64 = 2;
const TBT_BONUS: i64 = 1;

/// Unclamped score. Can leave `[0, 100]` in either direction.
pub fn raw_score(record: &MetricRecord) -> i64 {
    MAX_SCORE - i64::from(record.first_aid_cases) * FIRST_AID_PENALTY
        - i64::from(record.near_miss_cases) * NEAR_MISS_PENALTY
        - i64::from(record.open_permits()) * OPEN_PERMIT_PENALTY
        + i64::from(record.training_sessions) * TRAINING_BONUS
        + i64::from(record.tbt_sessions) * TBT_BONUS
}

pub fn score(record: &MetricRecord) -> u8 {
    clamp_score(raw_score(record))
}

pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(MIN_SCORE, MAX_SCORE) as u8
}

/// Halves round toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Mean of the values, rounded half-up. `None` for an empty slice.
pub(crate) fn rounded_mean<I>(values: I) -> Option<i64>
where
    I: IntoIterator<Item = i64>,
{
    mean(values).map(round_half_up)
}

pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = i64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}
