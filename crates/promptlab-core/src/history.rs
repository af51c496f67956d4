//! Evaluation history store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Evaluation, Result};

/// Lowest and highest star rating
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Human feedback for one model's response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

impl Feedback {
    /// Create feedback with a star rating
    pub fn rating(rating: u8) -> Self {
        Self {
            rating: Some(rating),
            comment: None,
        }
    }

    /// Attach a comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Reject ratings outside 1..=5
    pub fn validate(&self) -> Result<()> {
        match self.rating {
            Some(rating) if !RATING_RANGE.contains(&rating) => Err(Error::InvalidInput(format!(
                "Rating must be between {} and {}, got {}",
                RATING_RANGE.start(),
                RATING_RANGE.end(),
                rating
            ))),
            _ => Ok(()),
        }
    }

    /// Apply to an evaluation, overwriting any previous feedback for the model
    pub fn apply(&self, evaluation: &mut Evaluation, model: &str) -> Result<()> {
        self.validate()?;
        if let Some(rating) = self.rating {
            evaluation.ratings.insert(model.to_string(), rating);
        }
        if let Some(comment) = &self.comment {
            evaluation.comments.insert(model.to_string(), comment.clone());
        }
        Ok(())
    }
}

/// Trait for evaluation history persistence
///
/// Index 0 is always the most recent evaluation.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Reload evaluations from the backing storage
    async fn load(&mut self) -> Result<()>;

    /// Prepend a new evaluation
    async fn record(&mut self, evaluation: Evaluation) -> Result<()>;

    /// Attach feedback for `model` to the evaluation at `index`
    async fn save_feedback(&mut self, index: usize, model: &str, feedback: Feedback) -> Result<()>;

    /// Remove every evaluation
    async fn clear(&mut self) -> Result<()>;

    /// All evaluations, newest first
    fn list(&self) -> &[Evaluation];

    /// Get the evaluation at `index`
    fn get(&self, index: usize) -> Option<&Evaluation> {
        self.list().get(index)
    }
}
