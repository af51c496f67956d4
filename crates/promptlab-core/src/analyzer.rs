//! Prompt quality analyzer
//!
//! Scores a prompt against a fixed set of heuristics and proposes full
//! replacement prompts. Every check runs on every call; none of them
//! suppresses another.

use serde::{Deserialize, Serialize};

const BASE_SCORE: i32 = 85;
const BRIEF_PENALTY: i32 = 10;
const UNCLEAR_INTENT_PENALTY: i32 = 15;
const MIN_PROMPT_CHARS: usize = 20;
const MAX_PROMPT_TOKENS: usize = 50;

const EXAMPLES_SUFFIX: &str = " Please provide specific examples to illustrate your points.";
const STRUCTURE_SUFFIX: &str = "\n\nPlease structure your response with:\n1. Key points\n2. Detailed explanations\n3. Practical examples\n4. Summary or conclusion";

/// Severity of a detected issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// Kind of a detected issue. Only warnings are produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Warning,
}

/// A deficiency detected in a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub title: String,
    pub description: String,
    pub impact: Impact,
}

impl Issue {
    fn warning(title: &str, description: &str, impact: Impact) -> Self {
        Self {
            kind: IssueKind::Warning,
            title: title.to_string(),
            description: description.to_string(),
            impact,
        }
    }
}

/// A suggested replacement prompt and the reason for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    pub title: String,
    pub description: String,
    /// Complete candidate prompt, not a diff
    pub optimized: String,
}

impl Improvement {
    fn new(title: &str, description: &str, optimized: String) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            optimized,
        }
    }
}

/// Coarse band of an analysis score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreGrade {
    /// 80 and above
    Strong,
    /// 60 to 79
    Fair,
    /// Below 60
    Weak,
}

/// Result of analyzing a single prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnalysisReport {
    /// Starts at 85 and only goes down. Not clamped.
    pub score: i32,
    pub issues: Vec<Issue>,
    pub improvements: Vec<Improvement>,
    pub optimized_versions: Vec<String>,
}

impl PromptAnalysisReport {
    pub fn grade(&self) -> ScoreGrade {
        match self.score {
            s if s >= 80 => ScoreGrade::Strong,
            s if s >= 60 => ScoreGrade::Fair,
            _ => ScoreGrade::Weak,
        }
    }

    /// Look up an issue by title
    pub fn issue(&self, title: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.title == title)
    }

    /// Look up an improvement by title
    pub fn improvement(&self, title: &str) -> Option<&Improvement> {
        self.improvements.iter().find(|imp| imp.title == title)
    }
}

/// Heuristic prompt analyzer
#[derive(Debug, Clone, Default)]
pub struct PromptAnalyzer;

impl PromptAnalyzer {
    /// Create a new prompt analyzer
    pub fn new() -> Self {
        Self
    }

    /// Analyze a prompt. Total: every input, including "", yields a report.
    pub fn analyze(&self, prompt: &str) -> PromptAnalysisReport {
        let lower = prompt.to_lowercase();
        let mut score = BASE_SCORE;
        let mut issues = Vec::new();
        let mut improvements = Vec::new();

        if prompt.chars().count() < MIN_PROMPT_CHARS {
            issues.push(Issue::warning(
                "Too Brief",
                "Your prompt might be too short to get detailed responses.",
                Impact::Medium,
            ));
            score -= BRIEF_PENALTY;
        }

        if !prompt.contains('?') && !lower.contains("explain") && !lower.contains("describe") {
            issues.push(Issue::warning(
                "Unclear Intent",
                "Consider adding clear questions or instructions.",
                Impact::High,
            ));
            score -= UNCLEAR_INTENT_PENALTY;
        }

        if !lower.contains("example") && !lower.contains("specific") {
            improvements.push(Improvement::new(
                "Add Examples Request",
                "Ask for specific examples to get more concrete responses.",
                format!("{}{}", prompt, EXAMPLES_SUFFIX),
            ));
        }

        if prompt.split_whitespace().count() > MAX_PROMPT_TOKENS {
            improvements.push(Improvement::new(
                "Simplify Structure",
                "Break down complex prompts into clearer sections.",
                enumerate_sentences(prompt),
            ));
        }

        improvements.push(Improvement::new(
            "Enhanced Structure",
            "Add clear formatting and expectations.",
            format!("{}{}", prompt, STRUCTURE_SUFFIX),
        ));

        let optimized_versions = improvements
            .iter()
            .map(|imp| imp.optimized.clone())
            .collect();

        PromptAnalysisReport {
            score,
            issues,
            improvements,
            optimized_versions,
        }
    }
}

/// Rewrite a prompt as its first sentence followed by a numbered list of the
/// remaining `.`-delimited fragments. Empty fragments keep their number.
fn enumerate_sentences(prompt: &str) -> String {
    let mut out = String::with_capacity(prompt.len() + 16);
    for (i, sentence) in prompt.split('.').enumerate() {
        if i == 0 {
            out.push_str(sentence);
            out.push('.');
        } else {
            out.push_str(&format!("\n{}. {}", i, sentence.trim()));
        }
    }
    out
}
