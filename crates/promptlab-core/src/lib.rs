//! Core traits and types for promptlab
//!
//! This crate holds the pure heuristics (prompt analysis, response cleanup),
//! the domain records shared by the other crates, and the capability-facing
//! interfaces for the evaluation backend and the evaluation history store.

pub mod analyzer;
pub mod backend;
pub mod error;
pub mod history;
pub mod metrics;
pub mod normalizer;
pub mod templates;
pub mod types;


pub use analyzer::{Impact, Improvement, Issue, IssueKind, PromptAnalysisReport, PromptAnalyzer, ScoreGrade};
pub use backend::{EvaluationBackend, TimeRange};
pub use error::{Error, Result};
pub use history::{Feedback, HistoryStore};
pub use metrics::{Metric, Verdict};
pub use normalizer::ResponseNormalizer;
pub use templates::{PromptTemplate, TemplateLibrary, TemplateQuery, TemplateSort};
pub use types::*;
