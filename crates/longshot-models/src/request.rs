//! Generation request payload.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to synthesize a long video from a base prompt.
///
/// Only the shape is validated here; whether a given duration, resolution
/// or model is supported is decided by the generation service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct GenerateRequest {
    /// Base prompt the segment prompts are planned from
    #[validate(custom(function = "validate_not_blank"))]
    pub base_prompt: String,

    /// Seconds per segment
    #[serde(default = "default_seconds")]
    #[validate(range(min = 1, message = "seconds must be at least 1"))]
    pub seconds: u32,

    /// Number of segments
    #[serde(default = "default_segments")]
    #[validate(range(min = 1, message = "segments must be at least 1"))]
    pub segments: u32,

    /// Output resolution (e.g. "720p")
    #[serde(default = "default_resolution")]
    pub resolution: Option<String>,

    /// Output aspect ratio (e.g. "16:9")
    #[serde(default = "default_aspect")]
    pub aspect: Option<String>,

    /// Override for the prompt-planning language model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_model: Option<String>,

    /// Override for the video-generation model
    #[serde(default, alias = "fal_model", skip_serializing_if = "Option::is_none")]
    pub generator_model: Option<String>,
}

fn default_seconds() -> u32 {
    8
}

fn default_segments() -> u32 {
    4
}

fn default_resolution() -> Option<String> {
    Some("720p".to_string())
}

fn default_aspect() -> Option<String> {
    Some("16:9".to_string())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("base_prompt must not be empty".into());
        return Err(err);
    }
    Ok(())
}

impl GenerateRequest {
    pub fn new(base_prompt: impl Into<String>) -> Self {
        Self {
            base_prompt: base_prompt.into(),
            seconds: default_seconds(),
            segments: default_segments(),
            resolution: default_resolution(),
            aspect: default_aspect(),
            planner_model: None,
            generator_model: None,
        }
    }

    pub fn with_segments(mut self, seconds: u32, segments: u32) -> Self {
        self.seconds = seconds;
        self.segments = segments;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"base_prompt": "a calm seaside sunset"}"#).unwrap();
        assert_eq!(req.seconds, 8);
        assert_eq!(req.segments, 4);
        assert_eq!(req.resolution.as_deref(), Some("720p"));
        assert_eq!(req.aspect.as_deref(), Some("16:9"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_fal_model_alias() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{"base_prompt": "city", "fal_model": "fal-ai/sora-2/text-to-video"}"#,
        )
        .unwrap();
        assert_eq!(req.generator_model.as_deref(), Some("fal-ai/sora-2/text-to-video"));
    }

    #[test]
    fn test_blank_prompt_rejected() {
        let req = GenerateRequest::new("   ");
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("base_prompt"));
    }

    #[test]
    fn test_zero_segments_rejected() {
        let req = GenerateRequest::new("forest").with_segments(8, 0);
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("segments"));
    }

    #[test]
    fn test_missing_prompt_is_a_decode_error() {
        let result: Result<GenerateRequest, _> = serde_json::from_str(r#"{"seconds": 4}"#);
        assert!(result.is_err());
    }
}
