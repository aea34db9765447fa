//! Write-only progress capability for one job.

use std::sync::Arc;

use longshot_models::{clamp_progress, JobId, JobUpdate};

use crate::store::JobStore;

/// Records progress for exactly one job.
///
/// The pipeline driver reports through this instead of touching the store,
/// so it can only ever change the progress and message of its own job.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    store: Arc<JobStore>,
    job_id: JobId,
}

impl ProgressReporter {
    pub fn new(store: Arc<JobStore>, job_id: JobId) -> Self {
        Self { store, job_id }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Record `value` clamped into `[0.0, 1.0]`.
    ///
    /// A non-empty `message` replaces the current one; `None` or an empty
    /// string keeps it.
    pub async fn report(&self, value: f64, message: Option<&str>) {
        let mut update = JobUpdate::new().progress(clamp_progress(value));
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            update = update.message(message);
        }
        self.store.update(&self.job_id, update).await;
    }
}
