//! Response text normalizer
//!
//! Models frequently echo the conversation turn they were given before the
//! actual answer. This strips that leading echo for display.

const ECHO_MARKERS: [&str; 3] = ["Human:", "User:", "Question:"];

/// Removes an echoed prompt from the start of a generated response
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Create a new response normalizer
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw response. Total and idempotent.
    ///
    /// The result starts at the first non-blank line carrying none of the
    /// echo markers. When that line is already the first one, or no line
    /// qualifies, the input is only trimmed.
    pub fn clean(&self, text: &str) -> String {
        let lines: Vec<&str> = text.split('\n').collect();

        match lines.iter().position(|line| is_answer_line(line)) {
            Some(start) if start > 0 => lines[start..].join("\n").trim().to_string(),
            _ => text.trim().to_string(),
        }
    }
}

fn is_answer_line(line: &str) -> bool {
    !line.trim().is_empty() && !ECHO_MARKERS.iter().any(|marker| line.contains(marker))
}
