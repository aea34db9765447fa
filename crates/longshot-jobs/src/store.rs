//! In-memory job registry.
//!
//! The store is the only shared mutable state in the job system. Every
//! read returns an owned snapshot and every write applies a whole
//! [`JobUpdate`] under one write lock, so readers never see a record
//! halfway through an update.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use longshot_models::{JobId, JobLogEntry, JobRecord, JobUpdate};

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<JobId, JobRecord>,
    /// IDs in creation order.
    order: Vec<JobId>,
}

/// Concurrent map from job ID to job record, plus each job's log.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<Records>,
    logs: RwLock<HashMap<JobId, Vec<JobLogEntry>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh queued record under a new unique ID.
    pub async fn create(&self) -> JobId {
        let mut jobs = self.jobs.write().await;
        let mut id = JobId::new();
        // IDs are never reused, however unlikely a v4 collision is.
        while jobs.by_id.contains_key(&id) {
            id = JobId::new();
        }
        jobs.by_id.insert(id.clone(), JobRecord::new(id.clone()));
        jobs.order.push(id.clone());
        drop(jobs);

        self.logs.write().await.insert(id.clone(), Vec::new());
        debug!(job_id = %id, "Job record created");
        id
    }

    /// Snapshot of a record, or `None` for an unknown ID.
    pub async fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.jobs.read().await.by_id.get(id).cloned()
    }

    /// A page of records, newest first.
    pub async fn list(&self, limit: usize, offset: usize) -> Vec<JobRecord> {
        let jobs = self.jobs.read().await;
        jobs.order
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .filter_map(|id| jobs.by_id.get(id).cloned())
            .collect()
    }

    /// Apply the provided fields of `update` atomically.
    ///
    /// Unknown IDs and updates the record refuses (leaving a terminal
    /// state, illegal transitions) are no-ops. Returns whether the update
    /// was applied.
    pub async fn update(&self, id: &JobId, update: JobUpdate) -> bool {
        let mut jobs = self.jobs.write().await;
        let Some(record) = jobs.by_id.get_mut(id) else {
            debug!(job_id = %id, "Ignoring update for unknown job");
            return false;
        };

        let applied = record.apply(update.clone());
        if !applied {
            warn!(
                job_id = %id,
                status = %record.status,
                ?update,
                "Rejected job update"
            );
        }
        applied
    }

    /// Append a line to a job's log. Unknown IDs are ignored.
    pub async fn append_log(&self, id: &JobId, entry: JobLogEntry) {
        if let Some(log) = self.logs.write().await.get_mut(id) {
            log.push(entry);
        }
    }

    /// The latest `limit` lines of a job's log, oldest first.
    pub async fn logs(&self, id: &JobId, limit: usize) -> Option<Vec<JobLogEntry>> {
        let logs = self.logs.read().await;
        let log = logs.get(id)?;
        let start = log.len().saturating_sub(limit);
        Some(log[start..].to_vec())
    }

    /// Number of jobs ever created in this process.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.by_id.is_empty()
    }
}
