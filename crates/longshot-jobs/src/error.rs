//! Job error types.

use longshot_generator::GeneratorError;
use thiserror::Error;
use validator::ValidationErrors;

pub type JobResult<T> = Result<T, JobError>;

#[derive(Debug, Error)]
pub enum JobError {
    /// Malformed request, rejected before a job is created.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Required credentials or settings absent at job start.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Planning failed: {0}")]
    Planning(#[source] GeneratorError),

    #[error("Generation failed: {0}")]
    Generation(#[source] GeneratorError),

    #[error("Pipeline panicked: {0}")]
    Panicked(String),
}

impl JobError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, JobError::Configuration(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, JobError::Validation(_))
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Validation(_) => "validation",
            JobError::Configuration(_) => "configuration",
            JobError::Planning(_) => "planning",
            JobError::Generation(_) => "generation",
            JobError::Panicked(_) => "panic",
        }
    }
}

impl From<ValidationErrors> for JobError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
