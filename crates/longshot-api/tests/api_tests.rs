//! API integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use longshot_api::{create_router, ApiConfig, AppState};
use longshot_generator::{
    CredentialsConfig, GeneratorClientConfig, HttpGenerator, VideoGenerator,
};
use longshot_jobs::testing::ScriptedGenerator;
use longshot_jobs::JobsConfig;

fn test_config() -> ApiConfig {
    ApiConfig {
        frontend_dir: "/nonexistent/frontend".into(),
        ..Default::default()
    }
}

fn app_with(config: ApiConfig, generator: Arc<dyn VideoGenerator>) -> (Router, AppState) {
    let state = AppState::new(
        config,
        JobsConfig::default(),
        generator,
        CredentialsConfig::new("sk-test", "fal-test"),
    );
    (create_router(state.clone(), None), state)
}

fn create_test_router() -> (Router, AppState) {
    app_with(
        test_config(),
        Arc::new(ScriptedGenerator::succeeding("/out/final.mp4")),
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    let body = body.to_string();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let (app, _) = create_test_router();

    for uri in ["/health", "/healthz"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    let (status, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generator"], "ok");
}

#[tokio::test]
async fn test_ready_reports_unreachable_generator() {
    let generator = HttpGenerator::new(GeneratorClientConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let (app, _) = app_with(test_config(), Arc::new(generator));

    let (status, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");
}

#[tokio::test]
async fn test_generate_then_poll_until_success() {
    let (app, state) = create_test_router();

    let (status, body) = send(
        &app,
        post_json(
            "/api/generate",
            json!({ "base_prompt": "a calm seaside sunset", "seconds": 8, "segments": 4 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["job_id"].as_str().unwrap().to_string();
    assert_eq!(job_id.len(), 32);

    assert!(state.jobs.wait_for_jobs(Duration::from_secs(5)).await);

    let (status, body) = send(&app, get(&format!("/api/status/{}", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["progress"], 1.0);
    assert_eq!(body["message"], "complete");

    let (_, body) = send(&app, get(&format!("/api/result/{}", job_id))).await;
    assert_eq!(body["final_path"], "/out/final.mp4");
    assert!(body.as_object().unwrap().contains_key("download_url"));
    assert!(body["download_url"].is_null());

    let (_, body) = send(&app, get(&format!("/api/jobs/{}/logs", job_id))).await;
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs[0]["message"], "accepted");
    assert!(logs.iter().any(|l| l["message"] == "generating 4 segments"));
}

#[tokio::test]
async fn test_request_defaults_and_legacy_model_field() {
    let (app, state) = create_test_router();

    let (status, body) = send(
        &app,
        post_json(
            "/api/generate",
            json!({ "base_prompt": "neon city at night", "fal_model": "fal-ai/veo3" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body["job_id"].is_string());
    assert!(state.jobs.wait_for_jobs(Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_unknown_job_is_not_found_status_not_404() {
    let (app, _) = create_test_router();

    let (status, body) = send(&app, get("/api/status/nope")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "not_found");

    let (status, body) = send(&app, get("/api/result/nope")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["final_path"].is_null());

    let (status, body) = send(&app, get("/api/jobs/nope/logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"], json!([]));
}

#[tokio::test]
async fn test_invalid_request_is_rejected() {
    let (app, state) = create_test_router();

    let (status, body) = send(
        &app,
        post_json("/api/generate", json!({ "base_prompt": "  ", "segments": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = send(
        &app,
        post_json("/api/generate", json!({ "base_prompt": "waves", "segments": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, post_json("/api/generate", json!({ "segments": 4 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "invalid_body");
    assert!(body["detail"].as_str().unwrap().contains("base_prompt"));

    let (status, body) = send(
        &app,
        post_json("/api/generate", json!({ "base_prompt": "waves", "seconds": -5 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "invalid_body");
    assert!(body["detail"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_body");

    assert!(state.jobs.store().is_empty().await);
}

#[tokio::test]
async fn test_jobs_listing_pages_newest_first() {
    let (app, state) = create_test_router();

    let mut ids = Vec::new();
    for prompt in ["first", "second", "third"] {
        let (_, body) = send(&app, post_json("/api/generate", json!({ "base_prompt": prompt }))).await;
        ids.push(body["job_id"].as_str().unwrap().to_string());
    }
    assert!(state.jobs.wait_for_jobs(Duration::from_secs(5)).await);

    let (status, body) = send(&app, get("/api/jobs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
    let listed: Vec<_> = body["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["job_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(listed, vec![ids[2].clone(), ids[1].clone(), ids[0].clone()]);

    let (_, body) = send(&app, get("/api/jobs?limit=1&offset=1")).await;
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["job_id"], ids[1].as_str());
    assert_eq!(jobs[0]["status"], "success");

    let (status, body) = send(&app, get("/api/jobs?limit=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_query");
}

#[tokio::test]
async fn test_logs_limit_returns_latest_lines() {
    let (app, state) = create_test_router();

    let (_, body) = send(
        &app,
        post_json("/api/generate", json!({ "base_prompt": "a calm seaside sunset" })),
    )
    .await;
    let job_id = body["job_id"].as_str().unwrap().to_string();
    assert!(state.jobs.wait_for_jobs(Duration::from_secs(5)).await);

    let (_, body) = send(&app, get(&format!("/api/jobs/{}/logs?limit=2", job_id))).await;
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1]["message"], "complete: /out/final.mp4");
}

#[tokio::test]
async fn test_missing_credentials_surface_as_job_error() {
    let state = AppState::new(
        test_config(),
        JobsConfig::default(),
        Arc::new(ScriptedGenerator::succeeding("/out/final.mp4")),
        CredentialsConfig::default(),
    );
    let app = create_router(state.clone(), None);

    let (status, body) = send(
        &app,
        post_json("/api/generate", json!({ "base_prompt": "a calm seaside sunset" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["job_id"].as_str().unwrap().to_string();
    assert!(state.jobs.wait_for_jobs(Duration::from_secs(5)).await);

    let (_, body) = send(&app, get(&format!("/api/status/{}", job_id))).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["progress"], 0.0);
    assert!(body["message"].as_str().unwrap().contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _) = create_test_router();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");

    let response = app.oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_metrics_route_absent_without_handle() {
    let (app, _) = create_test_router();
    let (status, _) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_frontend_served_after_api_routes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>longshot</h1>").unwrap();

    let config = ApiConfig {
        frontend_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let (app, _) = app_with(config, Arc::new(ScriptedGenerator::succeeding("/out/final.mp4")));

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<h1>longshot</h1>");

    let (status, body) = send(&app, get("/api/status/nope")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "not_found");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let config = ApiConfig {
        max_body_size: 64,
        ..test_config()
    };
    let (app, _) = app_with(config, Arc::new(ScriptedGenerator::succeeding("/out/final.mp4")));

    let prompt = "x".repeat(1024);
    let (status, _) = send(&app, post_json("/api/generate", json!({ "base_prompt": prompt }))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
