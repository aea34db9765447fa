//! Upstream API credentials.

use std::fmt;

use crate::error::{GeneratorError, GeneratorResult};

/// Environment variable holding the language-model key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the video-generation key.
pub const FAL_KEY_VAR: &str = "FAL_KEY";

/// Resolved credentials; both keys are present.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub llm_api_key: String,
    pub video_api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &"<redacted>")
            .field("video_api_key", &"<redacted>")
            .finish()
    }
}

/// Raw, possibly incomplete credentials as loaded from configuration.
#[derive(Clone, Default)]
pub struct CredentialsConfig {
    pub llm_api_key: Option<String>,
    pub video_api_key: Option<String>,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .field("video_api_key", &self.video_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialsConfig {
    pub fn new(llm_api_key: impl Into<String>, video_api_key: impl Into<String>) -> Self {
        Self {
            llm_api_key: Some(llm_api_key.into()),
            video_api_key: Some(video_api_key.into()),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            llm_api_key: std::env::var(OPENAI_API_KEY_VAR).ok(),
            video_api_key: std::env::var(FAL_KEY_VAR).ok(),
        }
    }

    /// Resolve into usable credentials, naming every missing variable.
    ///
    /// Blank values count as missing.
    pub fn resolve(&self) -> GeneratorResult<Credentials> {
        let llm = non_blank(&self.llm_api_key);
        let video = non_blank(&self.video_api_key);

        match (llm, video) {
            (Some(llm), Some(video)) => Ok(Credentials {
                llm_api_key: llm.to_string(),
                video_api_key: video.to_string(),
            }),
            (llm, video) => {
                let mut missing = Vec::new();
                if llm.is_none() {
                    missing.push(OPENAI_API_KEY_VAR);
                }
                if video.is_none() {
                    missing.push(FAL_KEY_VAR);
                }
                Err(GeneratorError::MissingCredentials(format!(
                    "{} must be set",
                    missing.join(" / ")
                )))
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
