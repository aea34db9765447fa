//! Job log: one call records a stage both as a tracing event and as a
//! stored [`JobLogEntry`] that clients can fetch.

use std::sync::Arc;

use tracing::{error, info, warn, Span};

use longshot_models::{JobId, JobLogEntry, JobStatus};

use crate::store::JobStore;

/// Pipeline milestones worth a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Accepted,
    Planning,
    Planned,
    Generating,
    Complete,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Accepted => "accepted",
            Stage::Planning => "planning",
            Stage::Planned => "planned",
            Stage::Generating => "generating",
            Stage::Complete => "complete",
            Stage::Failed => "failed",
        }
    }

    /// Job status while (or after) the stage is reached.
    pub fn status(&self) -> JobStatus {
        match self {
            Stage::Accepted => JobStatus::Queued,
            Stage::Planning | Stage::Planned | Stage::Generating => JobStatus::Running,
            Stage::Complete => JobStatus::Success,
            Stage::Failed => JobStatus::Error,
        }
    }
}

/// Writes one job's log.
#[derive(Debug, Clone)]
pub struct JobLogger {
    store: Arc<JobStore>,
    job_id: JobId,
}

impl JobLogger {
    pub fn new(store: Arc<JobStore>, job_id: JobId) -> Self {
        Self { store, job_id }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Span wrapping everything the pipeline does for this job.
    pub fn span(&self) -> Span {
        tracing::info_span!("generation_job", job_id = %self.job_id)
    }

    pub async fn stage(&self, stage: Stage, progress: f64, message: &str) {
        info!(
            job_id = %self.job_id,
            stage = stage.as_str(),
            status = %stage.status(),
            progress,
            "{}", message
        );
        self.store
            .append_log(&self.job_id, JobLogEntry::info(message))
            .await;
    }

    /// `kind` is the error class, as used for metric labels.
    pub async fn failure(&self, kind: &'static str, message: &str) {
        error!(
            job_id = %self.job_id,
            stage = Stage::Failed.as_str(),
            status = %Stage::Failed.status(),
            kind,
            "{}", message
        );
        self.store
            .append_log(&self.job_id, JobLogEntry::error(message))
            .await;
    }

    /// Operator-only warning; not stored in the job's log.
    pub fn warn(&self, message: &str) {
        warn!(job_id = %self.job_id, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use longshot_models::LogLevel;

    use super::*;

    #[test]
    fn test_stage_status_follows_lifecycle() {
        assert_eq!(Stage::Accepted.status(), JobStatus::Queued);
        assert_eq!(Stage::Generating.status(), JobStatus::Running);
        assert_eq!(Stage::Complete.status(), JobStatus::Success);
        assert!(Stage::Failed.status().is_terminal());
    }

    #[tokio::test]
    async fn test_stage_and_failure_are_stored() {
        let store = Arc::new(JobStore::new());
        let id = store.create().await;
        let logger = JobLogger::new(Arc::clone(&store), id.clone());

        logger.stage(Stage::Planning, 0.0, "planning").await;
        logger.failure("planning", "error: planner offline").await;
        logger.warn("not stored");

        let logs = store.logs(&id, usize::MAX).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].level, LogLevel::Info);
        assert_eq!(logs[0].message, "planning");
        assert_eq!(logs[1].level, LogLevel::Error);
        assert_eq!(logs[1].message, "error: planner offline");
    }
}
