//! HTTP response payloads.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{JobId, JobLogEntry, JobRecord};

/// Status reported for identifiers the service has never issued.
pub const NOT_FOUND_STATUS: &str = "not_found";

/// Response to an accepted generation request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateResponse {
    pub job_id: JobId,
}

/// Polling snapshot of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
    pub job_id: JobId,
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub progress: f64,
}

impl StatusResponse {
    /// Synthetic response for an unknown job.
    pub fn not_found(job_id: JobId) -> Self {
        Self {
            job_id,
            status: NOT_FOUND_STATUS.to_string(),
            message: "job does not exist".to_string(),
            progress: 0.0,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == NOT_FOUND_STATUS
    }
}

impl From<&JobRecord> for StatusResponse {
    fn from(record: &JobRecord) -> Self {
        Self {
            job_id: record.id.clone(),
            status: record.status.as_str().to_string(),
            message: record.message.clone(),
            progress: record.progress,
        }
    }
}

/// Final output of a job, if it has succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResultResponse {
    pub job_id: JobId,
    pub final_path: Option<String>,
    /// Reserved for hosted downloads; outputs are only local paths today.
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ResultResponse {
    pub fn absent(job_id: JobId) -> Self {
        Self {
            job_id,
            final_path: None,
            download_url: None,
        }
    }
}

/// One row of the job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobSummary {
    pub job_id: JobId,
    pub status: String,
    pub message: String,
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&JobRecord> for JobSummary {
    fn from(record: &JobRecord) -> Self {
        Self {
            job_id: record.id.clone(),
            status: record.status.as_str().to_string(),
            message: record.message.clone(),
            progress: record.progress,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// A page of jobs, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummary>,
    pub limit: usize,
    pub offset: usize,
    /// Jobs known to the service, across all pages
    pub total: usize,
}

/// Log lines recorded for a job, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobLogsResponse {
    pub job_id: JobId,
    pub logs: Vec<JobLogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JobStatus, JobUpdate};

    #[test]
    fn test_not_found_shape() {
        let resp = StatusResponse::not_found(JobId::from("missing"));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["progress"], 0.0);
        assert!(resp.is_not_found());
    }

    #[test]
    fn test_status_from_record() {
        let mut record = JobRecord::new(JobId::new());
        record.apply(
            JobUpdate::new()
                .status(JobStatus::Running)
                .message("planning")
                .progress(0.05),
        );
        let resp = StatusResponse::from(&record);
        assert_eq!(resp.status, "running");
        assert_eq!(resp.message, "planning");
        assert_eq!(resp.progress, 0.05);
    }

    #[test]
    fn test_result_always_carries_download_url() {
        let json = serde_json::to_value(ResultResponse::absent(JobId::from("j1"))).unwrap();
        assert!(json.as_object().unwrap().contains_key("download_url"));
        assert!(json["download_url"].is_null());
        assert!(json["final_path"].is_null());
    }

    #[test]
    fn test_summary_from_record() {
        let mut record = JobRecord::new(JobId::from("j2"));
        record.apply(JobUpdate::new().status(JobStatus::Running).progress(0.1));
        let summary = JobSummary::from(&record);
        assert_eq!(summary.job_id, JobId::from("j2"));
        assert_eq!(summary.status, "running");
        assert_eq!(summary.progress, 0.1);
        assert_eq!(summary.created_at, record.created_at);
    }
}
