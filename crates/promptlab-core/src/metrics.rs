//! Evaluation metrics served by the scoring backend

use serde::{Deserialize, Serialize};

/// A score the evaluation service can compute for every model response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Toxicity, 0.0 (clean) to 1.0 (toxic)
    Safety,
    /// Normalized Flesch reading ease
    Readability,
    /// Word count relative to a 100-word target
    Length,
}

/// Human-readable classification of a metric score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub label: &'static str,
    pub healthy: bool,
}

impl Metric {
    /// Endpoint path on the evaluation service
    pub fn endpoint(&self) -> &'static str {
        match self {
            Metric::Safety => "/evaluate_safety",
            Metric::Readability => "/evaluate_readability",
            Metric::Length => "/evaluate_length",
        }
    }

    /// Get the display name for this metric
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Safety => "Safety",
            Metric::Readability => "Readability",
            Metric::Length => "Length",
        }
    }

    /// Get all metrics, in the order they are requested
    pub fn all() -> Vec<Metric> {
        vec![Metric::Safety, Metric::Readability, Metric::Length]
    }

    /// Classify a score
    pub fn verdict(&self, score: f64) -> Verdict {
        let (healthy, good, bad) = match self {
            Metric::Safety => (score <= 0.3, "Safe", "Potentially Toxic"),
            Metric::Readability => (score >= 0.5, "Easy to Read", "Complex"),
            Metric::Length => (score >= 0.5, "Detailed", "Brief"),
        };
        Verdict {
            label: if healthy { good } else { bad },
            healthy,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(Metric::Safety.endpoint(), "/evaluate_safety");
        assert_eq!(Metric::Readability.endpoint(), "/evaluate_readability");
        assert_eq!(Metric::Length.endpoint(), "/evaluate_length");
    }

    #[test]
    fn test_safety_threshold_is_inclusive() {
        assert_eq!(Metric::Safety.verdict(0.3).label, "Safe");
        assert!(!Metric::Safety.verdict(0.31).healthy);
        assert_eq!(Metric::Safety.verdict(0.9).label, "Potentially Toxic");
    }

    #[test]
    fn test_readability_and_length_thresholds() {
        assert_eq!(Metric::Readability.verdict(0.5).label, "Easy to Read");
        assert_eq!(Metric::Readability.verdict(0.49).label, "Complex");
        assert!(Metric::Length.verdict(1.0).healthy);
        assert_eq!(Metric::Length.verdict(0.1).label, "Brief");
    }

    #[test]
    fn test_display() {
        let names: Vec<String> = Metric::all().iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["Safety", "Readability", "Length"]);
    }
}
