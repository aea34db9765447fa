//! Job metrics.

use metrics::{counter, gauge, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_SUBMITTED_TOTAL: &str = "longshot_jobs_submitted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "longshot_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "longshot_jobs_failed_total";
    pub const JOBS_RUNNING: &str = "longshot_jobs_running";
    pub const JOB_DURATION_SECONDS: &str = "longshot_job_duration_seconds";
}

/// Record job accepted.
pub fn record_job_submitted() {
    counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
}

/// Record a pipeline starting to run.
pub fn record_job_started() {
    gauge!(names::JOBS_RUNNING).increment(1.0);
}

/// Record job completed.
pub fn record_job_completed(duration_secs: f64) {
    gauge!(names::JOBS_RUNNING).decrement(1.0);
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
    histogram!(names::JOB_DURATION_SECONDS, "outcome" => "success").record(duration_secs);
}

/// Record job failed.
pub fn record_job_failed(kind: &'static str, duration_secs: f64) {
    gauge!(names::JOBS_RUNNING).decrement(1.0);
    counter!(names::JOBS_FAILED_TOTAL, "kind" => kind).increment(1);
    histogram!(names::JOB_DURATION_SECONDS, "outcome" => "error").record(duration_secs);
}
