//! User-facing query range and the bucket boundaries derived from it.

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::{
    error::{DurationError, FormatError, FormatSnafu, InvertedRangeSnafu},
    step::Step,
    time_bucket::{end_time_to_timestamp, exchange_to_time_bucket, start_time_to_timestamp},
};

/// A textual time range plus the step both boundaries are written at.
///
/// Boundaries are kept exactly as the caller supplied them; parsing happens
/// on conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Duration {
    start: String,
    end: String,
    step: Step,
}

impl Duration {
    /// Build a duration from its two boundaries and their step.
    pub fn new(start: impl Into<String>, end: impl Into<String>, step: Step) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            step,
        }
    }

    /// Range start as supplied.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Range end as supplied.
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Step both boundaries are written at.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Month and second bucket pairs for this range. Ordering is not checked.
    ///
    /// # Errors
    /// Returns [`FormatError`] if either boundary is malformed.
    pub fn to_time_buckets(&self) -> Result<DurationBuckets, FormatError> {
        exchange_to_time_bucket(self)
    }

    /// Epoch-millisecond bounds `[start, end)` covering every unit in the range.
    ///
    /// # Errors
    /// Returns [`FormatError`] if either boundary is malformed.
    pub fn to_timestamps(&self) -> Result<(i64, i64), FormatError> {
        Ok((
            start_time_to_timestamp(&self.start, self.step)?,
            end_time_to_timestamp(&self.end, self.step)?,
        ))
    }

    /// Convert the range and reject an end that precedes its start.
    ///
    /// # Errors
    /// Returns [`DurationError::Format`] for malformed boundaries and
    /// [`DurationError::InvertedRange`] when the start bucket is after the
    /// end bucket.
    pub fn validate(&self) -> Result<DurationBuckets, DurationError> {
        let buckets = self.to_time_buckets().context(FormatSnafu)?;
        ensure!(
            buckets.start_second_bucket <= buckets.end_second_bucket,
            InvertedRangeSnafu {
                start: buckets.start_second_bucket,
                end: buckets.end_second_bucket,
            }
        );
        Ok(buckets)
    }
}

/// Bucket boundaries for a [`Duration`].
///
/// Month buckets select coarse monthly indices; second buckets filter within
/// them. Both pairs are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationBuckets {
    /// `yyyyMM` of the range start.
    pub start_month_bucket: i64,
    /// `yyyyMM` of the range end.
    pub end_month_bucket: i64,
    /// Zero-padded `yyyyMMddHHmmss` of the range start.
    pub start_second_bucket: i64,
    /// Nine-padded `yyyyMMddHHmmss` of the range end.
    pub end_second_bucket: i64,
}

impl DurationBuckets {
    /// `(start_month, end_month, start_second, end_second)`.
    pub fn into_tuple(self) -> (i64, i64, i64, i64) {
        self.into()
    }
}

impl From<DurationBuckets> for (i64, i64, i64, i64) {
    fn from(b: DurationBuckets) -> Self {
        (
            b.start_month_bucket,
            b.end_month_bucket,
            b.start_second_bucket,
            b.end_second_bucket,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_ordered_range() {
        let d = Duration::new("2017-01-01 01", "2017-01-02 23", Step::Hour);
        let b = d.validate().unwrap();
        assert_eq!(b.start_second_bucket, 20170101010000);
        assert_eq!(b.end_second_bucket, 20170102239999);
        assert_eq!((b.start_month_bucket, b.end_month_bucket), (201701, 201701));
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let d = Duration::new("2017-03", "2017-01", Step::Month);
        assert_eq!(
            d.validate(),
            Err(DurationError::InvertedRange {
                start: 20170300000000,
                end: 20170199999999,
            })
        );
    }

    #[test]
    fn validate_wraps_format_error() {
        let d = Duration::new("2017-01", "2017-13", Step::Month);
        assert!(matches!(
            d.validate(),
            Err(DurationError::Format {
                source: FormatError::OutOfRange { field: "month", .. }
            })
        ));
    }

    #[test]
    fn boundaries_at_another_step_are_rejected() {
        let d = Duration::new("2017-01", "2017-01-05", Step::Month);
        assert!(matches!(
            d.to_time_buckets(),
            Err(FormatError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn timestamps_are_half_open() {
        let d = Duration::new("2017-01-01", "2017-01-01", Step::Day);
        let (start, end) = d.to_timestamps().unwrap();
        assert_eq!(end - start, 86_400_000);
    }

    #[test]
    fn serde_round_trip_uses_wire_names() {
        let d = Duration::new("2017-01", "2017-02", Step::Month);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"start": "2017-01", "end": "2017-02", "step": "MONTH"})
        );
        let back: Duration = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }
}
