//! HTTP backend for promptlab
//!
//! This crate provides the reqwest implementation of the EvaluationBackend
//! trait, talking to the generation and scoring service.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::HttpBackend;
pub use config::BackendConfig;

// Re-export core types for convenience
pub use promptlab_core::{EvaluationBackend, Error, Metric, ModelResponses, Result, ScoreMap, TimeRange};
