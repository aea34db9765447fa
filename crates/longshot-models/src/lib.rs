//! Shared data models for the Longshot backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job records, status transitions and partial updates
//! - Per-job log entries
//! - Generation requests and their shape validation
//! - HTTP response payloads

pub mod job;
pub mod job_log;
pub mod request;
pub mod responses;

// Re-export common types
pub use job::{clamp_progress, JobId, JobRecord, JobStatus, JobUpdate};
pub use job_log::{JobLogEntry, LogLevel};
pub use request::GenerateRequest;
pub use responses::{
    GenerateResponse, JobListResponse, JobLogsResponse, JobSummary, ResultResponse, StatusResponse,
};
