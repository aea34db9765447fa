//! Job service: accepts generation requests and answers polls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{info, warn};
use validator::Validate;

use longshot_generator::{CredentialsConfig, GenerationTask, VideoGenerator};
use longshot_models::{
    GenerateRequest, JobId, JobListResponse, JobLogsResponse, JobStatus, JobSummary, JobUpdate,
    ResultResponse, StatusResponse,
};

use crate::config::JobsConfig;
use crate::driver::PipelineDriver;
use crate::error::JobResult;
use crate::logging::{JobLogger, Stage};
use crate::metrics;
use crate::store::JobStore;

/// Log lines returned when the caller gives no limit.
pub const DEFAULT_LOG_LIMIT: usize = 100;
/// Jobs per page when the caller gives no limit.
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

pub const MSG_SHUT_DOWN: &str = "error: service shut down before the job started";

/// Public entry point for generation jobs.
///
/// Each accepted job runs on its own detached task. The task waits for a
/// concurrency permit before the pipeline starts, so a job stays `queued`
/// while every slot is taken.
pub struct JobService {
    config: JobsConfig,
    store: Arc<JobStore>,
    generator: Arc<dyn VideoGenerator>,
    credentials: CredentialsConfig,
    job_semaphore: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
}

impl JobService {
    pub fn new(
        config: JobsConfig,
        generator: Arc<dyn VideoGenerator>,
        credentials: CredentialsConfig,
    ) -> Self {
        let job_semaphore = Arc::new(Semaphore::new(config.permits()));
        Self {
            config,
            store: Arc::new(JobStore::new()),
            generator,
            credentials,
            job_semaphore,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn config(&self) -> &JobsConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// Accept a request and start its pipeline in the background.
    ///
    /// Only the request shape is checked here; credential problems surface
    /// later as the job's `error` status.
    pub async fn submit(&self, request: &GenerateRequest) -> JobResult<JobId> {
        request.validate()?;

        let job_id = self.store.create().await;
        let logger = JobLogger::new(Arc::clone(&self.store), job_id.clone());
        logger.stage(Stage::Accepted, 0.0, "accepted").await;
        metrics::record_job_submitted();
        info!(
            job_id = %job_id,
            segments = request.segments,
            seconds = request.seconds,
            "Accepted generation job"
        );

        let driver = PipelineDriver::new(
            Arc::clone(&self.store),
            Arc::clone(&self.generator),
            self.credentials.clone(),
            job_id.clone(),
            GenerationTask::from(request),
        );
        let semaphore = Arc::clone(&self.job_semaphore);
        let store = Arc::clone(&self.store);
        let guard = InFlightGuard::new(Arc::clone(&self.in_flight));

        tokio::spawn(async move {
            let _guard = guard;
            match semaphore.acquire_owned().await {
                Ok(_permit) => driver.run().await,
                Err(_) => abandon(&store, &logger).await,
            }
        });

        Ok(job_id)
    }

    /// Current snapshot, or a `not_found` status for unknown ids.
    pub async fn status(&self, job_id: &JobId) -> StatusResponse {
        match self.store.get(job_id).await {
            Some(record) => StatusResponse::from(&record),
            None => StatusResponse::not_found(job_id.clone()),
        }
    }

    /// Final path, present only once the job has succeeded.
    pub async fn result(&self, job_id: &JobId) -> ResultResponse {
        match self.store.get(job_id).await {
            Some(record) if record.status == JobStatus::Success => ResultResponse {
                job_id: job_id.clone(),
                final_path: record.result,
                download_url: None,
            },
            _ => ResultResponse::absent(job_id.clone()),
        }
    }

    /// The latest `limit` log entries for a job; empty for unknown ids.
    pub async fn logs(&self, job_id: &JobId, limit: usize) -> JobLogsResponse {
        JobLogsResponse {
            job_id: job_id.clone(),
            logs: self.store.logs(job_id, limit).await.unwrap_or_default(),
        }
    }

    /// A page of jobs, newest first. `limit` is capped at [`MAX_PAGE_SIZE`].
    pub async fn list(&self, limit: usize, offset: usize) -> JobListResponse {
        let limit = limit.min(MAX_PAGE_SIZE);
        let jobs = self.store.list(limit, offset).await;
        JobListResponse {
            jobs: jobs.iter().map(JobSummary::from).collect(),
            limit,
            offset,
            total: self.store.len().await,
        }
    }

    /// Stop starting new pipelines.
    ///
    /// Jobs still waiting for a slot, and any submitted afterwards, end in
    /// `error`. Running pipelines finish normally.
    pub fn shutdown(&self) {
        info!("Closing job admission");
        self.job_semaphore.close();
    }

    /// Jobs accepted but not yet finished, queued ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait for in-flight jobs to finish. Returns false on timeout.
    pub async fn wait_for_jobs(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let remaining = self.in_flight();
            if remaining == 0 {
                info!("All jobs completed");
                return true;
            }

            if tokio::time::Instant::now() >= deadline {
                warn!("Shutdown timeout reached with {} jobs still running", remaining);
                return false;
            }

            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

/// Fail a job that never got to run. The status machine only reaches
/// `error` through `running`, so both steps are recorded.
async fn abandon(store: &JobStore, logger: &JobLogger) {
    logger.warn("job admission closed before the job started");
    let job_id = logger.job_id();
    store
        .update(job_id, JobUpdate::new().status(JobStatus::Running))
        .await;
    store
        .update(
            job_id,
            JobUpdate::new().status(JobStatus::Error).message(MSG_SHUT_DOWN),
        )
        .await;
    logger.failure("shutdown", MSG_SHUT_DOWN).await;
}

/// Counts a job as in flight until dropped.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
