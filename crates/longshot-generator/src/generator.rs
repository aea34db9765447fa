//! The generation collaborator seam.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::GeneratorResult;
use crate::types::{GenerationTask, PlannedSegment};

/// Plans and renders long videos.
///
/// Both calls are long-running and may fail; neither reports progress from
/// inside the call.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Split the base prompt into per-segment prompts.
    async fn plan(
        &self,
        credentials: &Credentials,
        task: &GenerationTask,
    ) -> GeneratorResult<Vec<PlannedSegment>>;

    /// Render every segment and merge them, returning the merged file.
    async fn generate(
        &self,
        credentials: &Credentials,
        task: &GenerationTask,
    ) -> GeneratorResult<PathBuf>;

    /// Whether the backing service is reachable.
    async fn health_check(&self) -> bool {
        true
    }
}
