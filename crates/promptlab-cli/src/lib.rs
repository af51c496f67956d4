//! Comparison sessions, evaluation history and terminal rendering for promptlab

mod history;
mod session;
mod ui;


pub use history::{JsonHistoryStore, DEFAULT_HISTORY_FILE};
pub use session::{ComparisonOutcome, ComparisonSession};
pub use ui::{
    display_banner, display_text, render_categories, render_evaluation, render_history,
    render_outcome, render_report, render_templates, stars, EMPTY_RESPONSE_PLACEHOLDER,
};

// Re-export core types
pub use promptlab_core::{Error, Result};
