//! Comparison session: one prompt fanned out to every model, scored and recorded

use chrono::Utc;
use futures::future::join_all;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use promptlab_core::{
    Error, Evaluation, EvaluationBackend, EvaluationMetrics, Feedback, HistoryStore, Metric,
    ModelResponses, ResponseNormalizer, Result, ScoreMap,
};

/// Result of submitting a prompt
#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    /// The evaluation as recorded in history (raw responses)
    pub evaluation: Evaluation,
    /// Responses with echoed prompts stripped, for display
    pub cleaned: ModelResponses,
    /// Metrics the backend failed to score
    pub failed_metrics: Vec<Metric>,
}

/// Drives a backend and records every submission in a history store
pub struct ComparisonSession<B: EvaluationBackend, H: HistoryStore> {
    backend: B,
    history: H,
    normalizer: ResponseNormalizer,
}

impl<B: EvaluationBackend, H: HistoryStore> ComparisonSession<B, H> {
    /// Create a new comparison session
    pub fn new(backend: B, history: H) -> Self {
        Self {
            backend,
            history,
            normalizer: ResponseNormalizer::new(),
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate, score and record responses for a prompt.
    ///
    /// Generation failures abort the submission. A metric the backend fails
    /// to score is left empty and reported in `failed_metrics`.
    pub async fn submit(&mut self, prompt: &str, image_url: Option<&str>) -> Result<ComparisonOutcome> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidInput("Please enter a prompt first".to_string()));
        }

        let started = Instant::now();
        let responses = self.backend.generate(prompt).await?;
        let elapsed = started.elapsed().as_secs_f64();
        info!(models = responses.len(), elapsed_secs = elapsed, "Responses generated");

        let metrics = Metric::all();
        let results = join_all(
            metrics
                .iter()
                .map(|metric| self.backend.evaluate(*metric, &responses)),
        )
        .await;

        let mut scores = EvaluationMetrics {
            response_time: responses.keys().map(|model| (model.clone(), elapsed)).collect(),
            ..Default::default()
        };
        let mut failed_metrics = Vec::new();

        for (metric, result) in metrics.into_iter().zip(results) {
            let map = match result {
                Ok(map) => map,
                Err(e) => {
                    warn!(%metric, error = %e, "Evaluation failed, keeping responses without it");
                    failed_metrics.push(metric);
                    ScoreMap::new()
                }
            };
            match metric {
                Metric::Safety => scores.toxicity = map,
                Metric::Readability => scores.readability = map,
                Metric::Length => scores.length = map,
            }
        }

        let cleaned = responses
            .iter()
            .map(|(model, text)| (model.clone(), self.normalizer.clean(text)))
            .collect();

        let evaluation = Evaluation {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.to_string(),
            image_url: image_url.unwrap_or_default().to_string(),
            responses,
            ratings: Default::default(),
            comments: Default::default(),
            timestamp: Utc::now().timestamp_millis(),
            prompt_version: None,
            metrics: Some(scores),
        };

        self.history.record(evaluation.clone()).await?;

        Ok(ComparisonOutcome {
            evaluation,
            cleaned,
            failed_metrics,
        })
    }

    /// Save a rating and/or comment for one model of a recorded evaluation
    pub async fn feedback(&mut self, index: usize, model: &str, feedback: Feedback) -> Result<()> {
        self.history.save_feedback(index, model, feedback).await?;
        info!(index, model, "Feedback saved");
        Ok(())
    }
}
