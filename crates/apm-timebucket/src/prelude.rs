//! Wrapper prelude.
//!
//! The `apm-timebucket` crate is the supported public entry point.
//! Downstream code should prefer importing from this prelude instead of
//! depending on internal core module paths.

pub use crate::{
    Duration, DurationBuckets, DurationError, DurationPoint, FormatError, MAX_POINTS,
    ParseStepError, PointsError, Step, duration_points, end_time_to_timestamp,
    exchange_to_time_bucket, start_time_to_timestamp, to_month_time_bucket, to_second_time_bucket,
    to_step_time_bucket,
};

#[cfg(feature = "query")]
pub use crate::query::{ApplicationQuery, QueryError};
