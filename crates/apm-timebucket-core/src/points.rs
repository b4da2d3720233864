//! Enumerate the step-sized units covered by a bucket range.
//!
//! Charts render one value per unit; each [`DurationPoint`] carries the
//! unit's step bucket and its length, so per-unit counters can be turned
//! into rates (calls per minute, ...). Months use their real calendar
//! length.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::{
    error::{InvalidBucketSnafu, InvertedPointsSnafu, PointsError, TooManyPointsSnafu},
    step::{FULL_GROUPS, Step},
    time_bucket::{encode_step_bucket, next_unit},
};

/// Largest number of points [`duration_points`] returns; a year of minutes
/// still fits.
pub const MAX_POINTS: u64 = 1_000_000;

/// One unit of a range at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPoint {
    /// Step bucket of the unit (`yyyyMM` for months, `yyyyMMdd` for days, ...).
    pub point: i64,
    /// Length of the unit in seconds.
    pub seconds_between: i64,
    /// Length of the unit in whole minutes (0 for a second).
    pub minutes_between: i64,
}

/// Decode a step bucket back into the start of the unit it names.
fn decode_step_bucket(bucket: i64, step: Step) -> Option<NaiveDateTime> {
    let present = step.format().groups;

    let mut groups: [u32; FULL_GROUPS] = [1, 1, 0, 0, 0];
    let mut rest = bucket;
    for slot in groups[..present].iter_mut().rev() {
        *slot = u32::try_from(rest % 100).ok()?;
        rest /= 100;
    }
    let year = i32::try_from(rest).ok()?;
    // Exactly four year digits, matching the textual layout.
    if !(1000..=9999).contains(&year) {
        return None;
    }

    let [month, day, hour, minute, second] = groups;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(date.and_time(time))
}

/// Units from `start` to `end` inclusive; both are unit starts with `start <= end`.
fn unit_count(start: &NaiveDateTime, end: &NaiveDateTime, step: Step) -> u64 {
    let span = match step {
        Step::Month => {
            let months = |dt: &NaiveDateTime| i64::from(dt.year()) * 12 + i64::from(dt.month0());
            months(end) - months(start)
        }
        Step::Day => (*end - *start).num_days(),
        Step::Hour => (*end - *start).num_hours(),
        Step::Minute => (*end - *start).num_minutes(),
        Step::Second => (*end - *start).num_seconds(),
    };
    span.unsigned_abs() + 1
}

/// List every unit from `start_bucket` to `end_bucket` inclusive.
///
/// Both buckets are step buckets as produced by
/// [`to_step_time_bucket`](crate::time_bucket::to_step_time_bucket).
///
/// # Errors
/// Returns [`PointsError::InvalidBucket`] when a bucket is not a calendar
/// time at `step`, [`PointsError::InvertedPoints`] when
/// `start_bucket > end_bucket`, and [`PointsError::TooManyPoints`] when the
/// range holds more than [`MAX_POINTS`] units.
pub fn duration_points(
    step: Step,
    start_bucket: i64,
    end_bucket: i64,
) -> Result<Vec<DurationPoint>, PointsError> {
    let start = decode_step_bucket(start_bucket, step).context(InvalidBucketSnafu {
        bucket: start_bucket,
        step,
    })?;
    let end = decode_step_bucket(end_bucket, step).context(InvalidBucketSnafu {
        bucket: end_bucket,
        step,
    })?;
    ensure!(
        start <= end,
        InvertedPointsSnafu {
            start: start_bucket,
            end: end_bucket,
        }
    );

    let count = unit_count(&start, &end, step);
    ensure!(
        count <= MAX_POINTS,
        TooManyPointsSnafu {
            count,
            limit: MAX_POINTS,
        }
    );

    let mut points = Vec::with_capacity(usize::try_from(count).unwrap_or_default());
    let mut current = start;
    while current <= end {
        let Some(next) = next_unit(&current, step) else {
            break;
        };
        let seconds = (next - current).num_seconds();
        points.push(DurationPoint {
            point: encode_step_bucket(&current, step),
            seconds_between: seconds,
            minutes_between: seconds / 60,
        });
        current = next;
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(points: &[DurationPoint]) -> Vec<i64> {
        points.iter().map(|p| p.point).collect()
    }

    #[test]
    fn months_carry_calendar_length() {
        let points = duration_points(Step::Month, 201601, 201603).unwrap();
        assert_eq!(buckets(&points), vec![201601, 201602, 201603]);

        let days: Vec<i64> = points.iter().map(|p| p.seconds_between / 86_400).collect();
        assert_eq!(days, vec![31, 29, 31]);
        assert_eq!(points[1].minutes_between, 29 * 24 * 60);
    }

    #[test]
    fn months_cross_year_boundary() {
        let points = duration_points(Step::Month, 201611, 201702).unwrap();
        assert_eq!(buckets(&points), vec![201611, 201612, 201701, 201702]);
    }

    #[test]
    fn days_cross_month_boundary() {
        let points = duration_points(Step::Day, 20170130, 20170202).unwrap();
        assert_eq!(
            buckets(&points),
            vec![20170130, 20170131, 20170201, 20170202]
        );
        assert!(points.iter().all(|p| p.seconds_between == 86_400));
    }

    #[test]
    fn hours_and_minutes_roll_over() {
        let hours = duration_points(Step::Hour, 2017010122, 2017010201).unwrap();
        assert_eq!(
            buckets(&hours),
            vec![2017010122, 2017010123, 2017010200, 2017010201]
        );
        assert!(hours.iter().all(|p| p.minutes_between == 60));

        let minutes = duration_points(Step::Minute, 201701010159, 201701010201).unwrap();
        assert_eq!(
            buckets(&minutes),
            vec![201701010159, 201701010200, 201701010201]
        );
    }

    #[test]
    fn seconds_have_no_whole_minute() {
        let points = duration_points(Step::Second, 20170101000059, 20170101000100).unwrap();
        assert_eq!(buckets(&points), vec![20170101000059, 20170101000100]);
        assert!(
            points
                .iter()
                .all(|p| p.seconds_between == 1 && p.minutes_between == 0)
        );
    }

    #[test]
    fn single_unit_range_has_one_point() {
        let points = duration_points(Step::Day, 20170101, 20170101).unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn unit_count_matches_listing() {
        let months = duration_points(Step::Month, 201611, 201702).unwrap();
        let days = duration_points(Step::Day, 20160201, 20160301).unwrap();
        assert_eq!(months.len(), 4);
        assert_eq!(days.len(), 30);
    }

    #[test]
    fn year_of_seconds_exceeds_limit() {
        assert_eq!(
            duration_points(Step::Second, 20170101000000, 20171231235959),
            Err(PointsError::TooManyPoints {
                count: 31_536_000,
                limit: MAX_POINTS,
            })
        );
    }

    #[test]
    fn widest_second_range_is_rejected_before_allocating() {
        assert!(matches!(
            duration_points(Step::Second, 10000101000000, 99991231235959),
            Err(PointsError::TooManyPoints { .. })
        ));
    }

    #[test]
    fn year_of_minutes_fits_under_limit() {
        let points = duration_points(Step::Minute, 201701010000, 201712312359).unwrap();
        assert_eq!(points.len(), 525_600);
    }

    #[test]
    fn rejects_inverted_range() {
        assert_eq!(
            duration_points(Step::Month, 201703, 201701),
            Err(PointsError::InvertedPoints {
                start: 201703,
                end: 201701,
            })
        );
    }

    #[test]
    fn rejects_bucket_at_wrong_precision() {
        // A second bucket is not a month bucket.
        assert_eq!(
            duration_points(Step::Month, 20170100000000, 201702),
            Err(PointsError::InvalidBucket {
                bucket: 20170100000000,
                step: Step::Month,
            })
        );
        assert!(duration_points(Step::Day, 20170230, 20170301).is_err());
        assert!(duration_points(Step::Month, -201701, 201702).is_err());
    }
}
