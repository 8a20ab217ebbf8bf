//! Queue metrics.
//!
//! Recorded through the `metrics` facade; installing an exporter is up to the
//! embedding application.

use metrics::{counter, gauge, histogram};

use creel_models::JobState;

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_SUBMITTED_TOTAL: &str = "creel_jobs_submitted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "creel_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "creel_jobs_failed_total";
    pub const JOBS_CANCELLED_TOTAL: &str = "creel_jobs_cancelled_total";
    pub const QUEUE_LENGTH: &str = "creel_queue_length";
    pub const JOB_DURATION_SECONDS: &str = "creel_job_duration_seconds";
}

/// Record an accepted submission.
pub fn record_job_submitted() {
    counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
}

/// Record a job reaching a terminal state.
pub fn record_job_finished(state: JobState, duration_secs: f64) {
    match state {
        JobState::Completed => {
            counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
            histogram!(names::JOB_DURATION_SECONDS).record(duration_secs);
        }
        JobState::Failed => {
            counter!(names::JOBS_FAILED_TOTAL).increment(1);
            histogram!(names::JOB_DURATION_SECONDS).record(duration_secs);
        }
        JobState::Cancelled => counter!(names::JOBS_CANCELLED_TOTAL).increment(1),
        JobState::Queued | JobState::Running => {}
    }
}

/// Update the pending jobs gauge.
pub fn set_queue_length(len: usize) {
    gauge!(names::QUEUE_LENGTH).set(len as f64);
}
