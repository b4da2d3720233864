use apm_timebucket_core::{Duration, DurationBuckets, DurationPoint};
use serde::Serialize;
use snafu::ResultExt;

use crate::error::{CliResult, RenderJsonSnafu};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub duration: Duration,
    #[serde(flatten)]
    pub buckets: DurationBuckets,
    pub start_timestamp_ms: i64,
    pub end_timestamp_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointsReport {
    pub duration: Duration,
    pub points: Vec<DurationPoint>,
}

pub fn render_convert(report: &ConvertReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report).context(RenderJsonSnafu),
        OutputFormat::Text => {
            let b = &report.buckets;
            Ok(format!(
                "step: {}\n\
                 month buckets: {} .. {}\n\
                 second buckets: {} .. {}\n\
                 timestamps (ms): {} .. {}",
                report.duration.step(),
                b.start_month_bucket,
                b.end_month_bucket,
                b.start_second_bucket,
                b.end_second_bucket,
                report.start_timestamp_ms,
                report.end_timestamp_ms,
            ))
        }
    }
}

pub fn render_points(report: &PointsReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report).context(RenderJsonSnafu),
        OutputFormat::Text => {
            let mut out = format!("{:<16} {:>10} {:>10}", "point", "seconds", "minutes");
            for p in &report.points {
                out.push('\n');
                out.push_str(&format!(
                    "{:<16} {:>10} {:>10}",
                    p.point, p.seconds_between, p.minutes_between
                ));
            }
            Ok(out)
        }
    }
}
