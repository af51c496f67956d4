//! Common types used across the promptlab system

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model name to generated response text, as returned by `/generate`
pub type ModelResponses = BTreeMap<String, String>;

/// Model name to numeric score, as returned by the `/evaluate_*` endpoints
pub type ScoreMap = BTreeMap<String, f64>;

/// Model name to star rating (1-5)
pub type Ratings = BTreeMap<String, u8>;

/// Model name to free-text comment
pub type Comments = BTreeMap<String, String>;

/// Scores collected from the evaluation service for one submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationMetrics {
    #[serde(default)]
    pub toxicity: ScoreMap,
    #[serde(default)]
    pub readability: ScoreMap,
    #[serde(default)]
    pub length: ScoreMap,
    #[serde(default)]
    pub response_time: ScoreMap,
}

/// One submitted prompt together with the model responses and human feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub image_url: String,
    pub responses: ModelResponses,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub comments: Comments,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<EvaluationMetrics>,
}

impl Evaluation {
    /// Average of the star ratings given so far, if any
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let total: u32 = self.ratings.values().map(|r| *r as u32).sum();
        Some(total as f64 / self.ratings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Evaluation {
        Evaluation {
            id: "1".to_string(),
            prompt: "Explain gravity?".to_string(),
            image_url: String::new(),
            responses: ModelResponses::new(),
            ratings: Ratings::new(),
            comments: Comments::new(),
            timestamp: 0,
            prompt_version: None,
            metrics: None,
        }
    }

    #[test]
    fn test_average_rating() {
        let mut evaluation = sample();
        assert_eq!(evaluation.average_rating(), None);

        evaluation.ratings.insert("a".to_string(), 4);
        evaluation.ratings.insert("b".to_string(), 5);
        assert_eq!(evaluation.average_rating(), Some(4.5));
    }

    #[test]
    fn test_evaluation_uses_camel_case_keys() {
        let mut evaluation = sample();
        evaluation.image_url = "http://img".to_string();
        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["imageUrl"], "http://img");
        assert!(json.get("metrics").is_none());
    }

    #[test]
    fn test_evaluation_accepts_missing_optional_fields() {
        let json = r#"{"id":"7","prompt":"p","responses":{"m":"r"},"timestamp":12}"#;
        let evaluation: Evaluation = serde_json::from_str(json).unwrap();
        assert_eq!(evaluation.responses["m"], "r");
        assert!(evaluation.ratings.is_empty());
        assert!(evaluation.image_url.is_empty());
    }
}
