//! Generation service request/response types.

use serde::{Deserialize, Serialize};
use longshot_models::GenerateRequest;

/// Optional per-job overrides of the service defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planner_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Parameters of one long-video generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTask {
    pub base_prompt: String,
    pub seconds_per_segment: u32,
    pub segment_count: u32,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

impl From<&GenerateRequest> for GenerationTask {
    fn from(req: &GenerateRequest) -> Self {
        Self {
            base_prompt: req.base_prompt.clone(),
            seconds_per_segment: req.seconds,
            segment_count: req.segments,
            options: GenerationOptions {
                planner_model: req.planner_model.clone(),
                generator_model: req.generator_model.clone(),
                resolution: req.resolution.clone(),
                aspect_ratio: req.aspect.clone(),
            },
        }
    }
}

/// One planned clip of the final video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSegment {
    /// Position in the final video, starting at 0
    pub index: u32,
    /// Prompt the segment is rendered from
    pub prompt: String,
    /// Segment duration
    pub seconds: u32,
}

/// Response from `/plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub segments: Vec<PlannedSegment>,
}

/// Response from `/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub final_path: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}
