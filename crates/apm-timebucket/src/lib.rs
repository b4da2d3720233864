//! # apm-timebucket
//!
//! Converts user-entered query durations into the digit-encoded time buckets
//! used to key time-partitioned metric stores.
//!
//! This crate is the supported public entry point and provides a small, stable surface.
//!
//! ## Features
//!
//! - `query` (default): Enables the application query facade and its service traits
//!
//! ## Example
//!
//! ```rust
//! use apm_timebucket::prelude::*;
//!
//! let duration = Duration::new("2017-01", "2017-02", Step::Month);
//! let buckets = exchange_to_time_bucket(&duration)?;
//! assert_eq!(
//!     buckets.into_tuple(),
//!     (201701, 201702, 20170100000000, 20170299999999)
//! );
//! # Ok::<(), FormatError>(())
//! ```

/// Convenience prelude with the stable, supported surface.
pub mod prelude;

/// Application query facade (enabled by default).
#[cfg(feature = "query")]
pub mod query {
    pub use apm_timebucket_core::query::*;
}

pub use apm_timebucket_core::duration::{Duration, DurationBuckets};
pub use apm_timebucket_core::error::{DurationError, FormatError, PointsError};
pub use apm_timebucket_core::points::{DurationPoint, MAX_POINTS, duration_points};
pub use apm_timebucket_core::step::{ParseStepError, Step};
pub use apm_timebucket_core::time_bucket::{
    end_time_to_timestamp, exchange_to_time_bucket, start_time_to_timestamp,
    to_month_time_bucket, to_second_time_bucket, to_step_time_bucket,
};
