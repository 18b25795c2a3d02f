//! Worker counters.
//!
//! Recorded through the `metrics` facade; the process installs the exporter.

use std::time::Duration;

use metrics::{counter, histogram};

use crate::error::ErrorCategory;

pub fn job_processed(stream: &str, duration: Duration) {
    counter!("stream_worker_jobs_total", "stream" => stream.to_string(), "status" => "success")
        .increment(1);
    histogram!("stream_worker_job_duration_seconds", "stream" => stream.to_string())
        .record(duration.as_secs_f64());
}

pub fn job_failed(stream: &str, category: ErrorCategory) {
    counter!(
        "stream_worker_jobs_total",
        "stream" => stream.to_string(),
        "status" => "failed",
        "category" => category.as_str()
    )
    .increment(1);
}

pub fn job_retried(stream: &str) {
    counter!("stream_worker_jobs_retried_total", "stream" => stream.to_string()).increment(1);
}

pub fn job_dead_lettered(stream: &str) {
    counter!("stream_worker_jobs_dlq_total", "stream" => stream.to_string()).increment(1);
}

pub fn jobs_claimed(stream: &str, count: usize) {
    counter!("stream_worker_jobs_claimed_total", "stream" => stream.to_string())
        .increment(count as u64);
}
