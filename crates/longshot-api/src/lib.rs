//! Axum HTTP API for long-video generation jobs.
//!
//! This crate provides:
//! - Job submission, status, result and log endpoints
//! - Health and readiness checks
//! - Optional Prometheus metrics and static frontend hosting

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
