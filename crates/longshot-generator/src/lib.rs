//! Client for the long-video generation service.
//!
//! The service plans per-segment prompts with a language model, renders
//! each segment with a video-generation model and concatenates the clips.
//! This crate only describes that boundary:
//! - [`VideoGenerator`], the trait the job pipeline drives
//! - [`HttpGenerator`], the HTTP implementation
//! - Upstream credentials and their validation

pub mod client;
pub mod credentials;
pub mod error;
pub mod generator;
pub mod types;

pub use client::{GeneratorClientConfig, HttpGenerator};
pub use credentials::{Credentials, CredentialsConfig, FAL_KEY_VAR, OPENAI_API_KEY_VAR};
pub use error::{GeneratorError, GeneratorResult};
pub use generator::VideoGenerator;
pub use types::{GenerationOptions, GenerationTask, PlannedSegment};
