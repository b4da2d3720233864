//! Core engine for turning user-entered query durations into time buckets.
//!
//! Metric stores partition their data by digit-encoded time buckets. This
//! crate provides the pieces query handlers need before they touch storage:
//!
//! - A per-step layout table describing how each granularity is written and
//!   padded (`step` module).
//! - Pure conversions from duration boundaries into second, month and step
//!   buckets and epoch timestamps (`time_bucket` module).
//! - The `Duration` value object with explicit range validation
//!   (`duration` module).
//! - Enumeration of the units covered by a bucket range (`points` module).
//! - A query facade that forwards converted buckets to injected services
//!   (`query` module, behind the default `query` feature).
//!
//! Front ends (for example the `apmtb` CLI) are expected to depend on this
//! crate rather than re-implement the bucket encoding.
#![deny(missing_docs)]
pub mod duration;
pub mod error;
pub mod points;
#[cfg(feature = "query")]
pub mod query;
pub mod step;
pub mod time_bucket;

pub use duration::{Duration, DurationBuckets};
pub use error::{DurationError, FormatError, PointsError};
pub use points::{DurationPoint, MAX_POINTS, duration_points};
#[cfg(feature = "query")]
pub use query::{ApplicationQuery, QueryError};
pub use step::{ParseStepError, Step};
pub use time_bucket::{
    end_time_to_timestamp, exchange_to_time_bucket, start_time_to_timestamp,
    to_month_time_bucket, to_second_time_bucket, to_step_time_bucket,
};
