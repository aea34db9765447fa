//! Job orchestration configuration.

use std::time::Duration;

use tokio::sync::Semaphore;

/// Job orchestration configuration.
#[derive(Debug, Clone)]
pub struct JobsConfig {
    /// Maximum pipelines running at once; 0 means unbounded.
    /// Jobs beyond the limit stay queued until a slot frees up.
    pub max_concurrent_jobs: usize,
    /// How long shutdown waits for in-flight jobs
    pub shutdown_timeout: Duration,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 4,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl JobsConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_concurrent_jobs: std::env::var("JOBS_MAX_CONCURRENT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            shutdown_timeout: Duration::from_secs(
                std::env::var("JOBS_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Number of semaphore permits backing the concurrency limit.
    pub fn permits(&self) -> usize {
        match self.max_concurrent_jobs {
            0 => Semaphore::MAX_PERMITS,
            n => n.min(Semaphore::MAX_PERMITS),
        }
    }
}
