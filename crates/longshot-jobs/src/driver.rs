//! Runs one job's plan-then-generate pipeline to a terminal state.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::Instrument;

use longshot_generator::{CredentialsConfig, GenerationTask, VideoGenerator};
use longshot_models::{JobId, JobStatus, JobUpdate};

use crate::error::{JobError, JobResult};
use crate::logging::{JobLogger, Stage};
use crate::metrics;
use crate::reporter::ProgressReporter;
use crate::store::JobStore;

/// Progress once the segment plan is known.
pub const PLAN_PROGRESS: f64 = 0.05;
/// Progress once segment rendering has been handed to the generator.
pub const GENERATE_PROGRESS: f64 = 0.10;

pub const MSG_PLANNING: &str = "planning";
pub const MSG_COMPLETE: &str = "complete";

/// Drives a single job from `queued` to `success` or `error`.
///
/// Every failure, including a panic inside the generator, ends up as the
/// job's `error` status; nothing escapes [`PipelineDriver::run`].
pub struct PipelineDriver {
    store: Arc<JobStore>,
    generator: Arc<dyn VideoGenerator>,
    credentials: CredentialsConfig,
    job_id: JobId,
    task: GenerationTask,
    logger: JobLogger,
}

impl PipelineDriver {
    pub fn new(
        store: Arc<JobStore>,
        generator: Arc<dyn VideoGenerator>,
        credentials: CredentialsConfig,
        job_id: JobId,
        task: GenerationTask,
    ) -> Self {
        let logger = JobLogger::new(Arc::clone(&store), job_id.clone());
        Self {
            store,
            generator,
            credentials,
            job_id,
            task,
            logger,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Execute the pipeline and finalize the job record.
    pub async fn run(self) {
        let span = self.logger.span();
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) {
        let started = self
            .store
            .update(
                &self.job_id,
                JobUpdate::new()
                    .status(JobStatus::Running)
                    .message(MSG_PLANNING)
                    .progress(0.0),
            )
            .await;
        if !started {
            self.logger.warn("job is not queued, pipeline not started");
            return;
        }

        let start = Instant::now();
        metrics::record_job_started();
        self.logger.stage(Stage::Planning, 0.0, MSG_PLANNING).await;

        let reporter = ProgressReporter::new(Arc::clone(&self.store), self.job_id.clone());
        let outcome = AssertUnwindSafe(self.execute(&reporter))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(JobError::Panicked(panic_message(payload.as_ref()))));

        let elapsed = start.elapsed().as_secs_f64();
        match outcome {
            Ok(final_path) => self.succeed(final_path, elapsed).await,
            Err(e) => self.fail(e, elapsed).await,
        }
    }

    async fn execute(&self, reporter: &ProgressReporter) -> JobResult<PathBuf> {
        let credentials = self
            .credentials
            .resolve()
            .map_err(|e| JobError::configuration(e.to_string()))?;

        let segments = self
            .generator
            .plan(&credentials, &self.task)
            .await
            .map_err(JobError::Planning)?;

        self.stage(
            reporter,
            Stage::Planned,
            PLAN_PROGRESS,
            &format!("plan ready: {} segments", segments.len()),
        )
        .await;
        self.stage(
            reporter,
            Stage::Generating,
            GENERATE_PROGRESS,
            &format!("generating {} segments", segments.len()),
        )
        .await;

        self.generator
            .generate(&credentials, &self.task)
            .await
            .map_err(JobError::Generation)
    }

    async fn stage(&self, reporter: &ProgressReporter, stage: Stage, progress: f64, message: &str) {
        reporter.report(progress, Some(message)).await;
        self.logger.stage(stage, progress, message).await;
    }

    async fn succeed(&self, final_path: PathBuf, elapsed: f64) {
        let path = final_path.to_string_lossy().into_owned();
        self.store
            .update(
                &self.job_id,
                JobUpdate::new()
                    .status(JobStatus::Success)
                    .message(MSG_COMPLETE)
                    .progress(1.0)
                    .result(path.clone()),
            )
            .await;
        self.logger
            .stage(Stage::Complete, 1.0, &format!("complete: {}", path))
            .await;
        metrics::record_job_completed(elapsed);
    }

    async fn fail(&self, error: JobError, elapsed: f64) {
        let message = format!("error: {}", error);
        // Progress stays at the last reported stage.
        self.store
            .update(
                &self.job_id,
                JobUpdate::new().status(JobStatus::Error).message(message.clone()),
            )
            .await;
        self.logger.failure(error.kind(), &message).await;
        metrics::record_job_failed(error.kind(), elapsed);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
