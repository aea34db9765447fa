//! Application state.

use std::sync::Arc;

use longshot_generator::{CredentialsConfig, HttpGenerator, VideoGenerator};
use longshot_jobs::{JobService, JobsConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub jobs: Arc<JobService>,
    pub generator: Arc<dyn VideoGenerator>,
}

impl AppState {
    /// Build state around an existing generator.
    pub fn new(
        config: ApiConfig,
        jobs_config: JobsConfig,
        generator: Arc<dyn VideoGenerator>,
        credentials: CredentialsConfig,
    ) -> Self {
        let jobs = JobService::new(jobs_config, Arc::clone(&generator), credentials);
        Self {
            config,
            jobs: Arc::new(jobs),
            generator,
        }
    }

    /// Create application state from environment variables.
    pub fn from_env(config: ApiConfig) -> anyhow::Result<Self> {
        let generator = HttpGenerator::from_env()?;
        Ok(Self::new(
            config,
            JobsConfig::from_env(),
            Arc::new(generator),
            CredentialsConfig::from_env(),
        ))
    }
}
