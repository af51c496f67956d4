//! Evaluation backend trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Metric, ModelResponses, Result, ScoreMap};

/// Window for the analytics bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    #[default]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    /// Query-string value understood by `/analytics`
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<TimeRange> {
        match s {
            "7d" => Some(TimeRange::Week),
            "30d" => Some(TimeRange::Month),
            "90d" => Some(TimeRange::Quarter),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for the external generation and scoring service
///
/// Implementations fan a prompt out to every configured model and score the
/// resulting responses. The shapes mirror the service's JSON: maps keyed by
/// model name.
#[async_trait]
pub trait EvaluationBackend: Send + Sync {
    /// Generate one response per model for the prompt
    async fn generate(&self, prompt: &str) -> Result<ModelResponses>;

    /// Score every response for a single metric
    async fn evaluate(&self, metric: Metric, responses: &ModelResponses) -> Result<ScoreMap>;

    /// Fetch the analytics bundle for a time window
    async fn analytics(&self, range: TimeRange) -> Result<serde_json::Value>;
}
