//! Server crate for the cast reports service.
//!
//! This crate contains the orchestrator that runs each report over the
//! catalogue, the configuration shared with the CLI, and the HTTP layer
//! that serves the reports as JSON.

pub mod config;
pub mod http;
pub mod orchestrator;

pub use config::{ConfigError, PipelineArgs};
pub use http::{AppError, AppResult, router};
pub use orchestrator::{CreditsCache, ReportOrchestrator, ReportPolicies, credits_cache_key};
