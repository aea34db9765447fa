//! Generation job orchestration.
//!
//! This crate provides:
//! - An in-memory job registry with atomic partial updates
//! - A per-job progress reporter that clamps progress
//! - The pipeline driver running plan and generate on a background task
//! - The job service accepting requests and answering status polls
//! - Structured job logging and job metrics

pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod reporter;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::JobsConfig;
pub use driver::PipelineDriver;
pub use error::{JobError, JobResult};
pub use logging::{JobLogger, Stage};
pub use reporter::ProgressReporter;
pub use service::{JobService, DEFAULT_LOG_LIMIT, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use store::JobStore;
