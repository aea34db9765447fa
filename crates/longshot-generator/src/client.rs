//! Generation service HTTP client.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::error::{GeneratorError, GeneratorResult};
use crate::generator::VideoGenerator;
use crate::types::{GenerateResponse, GenerationTask, HealthResponse, PlanResponse, PlannedSegment};

const LLM_KEY_HEADER: &str = "X-LLM-Api-Key";
const VIDEO_KEY_HEADER: &str = "X-Video-Api-Key";

/// Upstream error bodies end up in job messages; keep only a prefix.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Configuration for the generation client.
#[derive(Debug, Clone)]
pub struct GeneratorClientConfig {
    /// Base URL of the generation service
    pub base_url: String,
    /// Request timeout; rendering a long video can take a while
    pub timeout: Duration,
}

impl Default for GeneratorClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl GeneratorClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GENERATOR_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("GENERATOR_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
        }
    }
}

/// [`VideoGenerator`] backed by the generation service's HTTP API.
pub struct HttpGenerator {
    http: Client,
    config: GeneratorClientConfig,
}

impl HttpGenerator {
    /// Create a new client.
    pub fn new(config: GeneratorClientConfig) -> GeneratorResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GeneratorError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> GeneratorResult<Self> {
        Self::new(GeneratorClientConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        builder
            .header(LLM_KEY_HEADER, &credentials.llm_api_key)
            .header(VIDEO_KEY_HEADER, &credentials.video_api_key)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        credentials: &Credentials,
        task: &GenerationTask,
    ) -> GeneratorResult<T> {
        let url = self.url(path);
        debug!("Sending generation request to {}", url);

        let response = self
            .authorized(self.http.post(&url), credentials)
            .json(task)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> GeneratorResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::request_failed(format!(
                "generation service returned {}: {}",
                status,
                error_excerpt(&body)
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn error_excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[async_trait]
impl VideoGenerator for HttpGenerator {
    async fn plan(
        &self,
        credentials: &Credentials,
        task: &GenerationTask,
    ) -> GeneratorResult<Vec<PlannedSegment>> {
        let plan: PlanResponse = self.post("plan", credentials, task).await?;
        if plan.segments.is_empty() {
            return Err(GeneratorError::invalid_response("plan contains no segments"));
        }
        Ok(plan.segments)
    }

    async fn generate(
        &self,
        credentials: &Credentials,
        task: &GenerationTask,
    ) -> GeneratorResult<PathBuf> {
        let generated: GenerateResponse = self.post("generate", credentials, task).await?;
        if generated.final_path.trim().is_empty() {
            return Err(GeneratorError::invalid_response("empty final_path"));
        }
        Ok(PathBuf::from(generated.final_path))
    }

    async fn health_check(&self) -> bool {
        match self.http.get(self.url("health")).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<HealthResponse>().await {
                    Ok(health) => health.status == "healthy" || health.status == "ok",
                    Err(e) => {
                        warn!("Generation service health response unreadable: {}", e);
                        false
                    }
                }
            }
            Ok(response) => {
                warn!("Generation service health check failed: {}", response.status());
                false
            }
            Err(e) => {
                warn!("Generation service health check error: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeneratorClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_secs(3600));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = HttpGenerator::new(GeneratorClientConfig {
            base_url: "http://gen.internal/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.url("plan"), "http://gen.internal/plan");
    }

    #[test]
    fn test_error_excerpt_cuts_on_char_boundary() {
        assert_eq!(error_excerpt("  bad gateway \n"), "bad gateway");

        let long = "é".repeat(MAX_ERROR_BODY_CHARS + 50);
        let excerpt = error_excerpt(&long);
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), MAX_ERROR_BODY_CHARS + 3);
    }
}
