//! Prompt template library

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

const PLACEHOLDER_PATTERN: &str = r"\{([A-Za-z_][A-Za-z0-9_]*)\}";

/// A reusable prompt with `{variable}` placeholders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub template: String,
    pub description: String,
    pub variables: Vec<String>,
    pub tags: Vec<String>,
    pub usage_count: u32,
    pub average_rating: f64,
}

impl PromptTemplate {
    /// Fill every placeholder from `values`.
    ///
    /// Each declared variable must have a value. Placeholders that are not
    /// declared and have no value are left as written.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String> {
        if let Some(missing) = self.variables.iter().find(|var| !values.contains_key(*var)) {
            return Err(Error::InvalidInput(format!(
                "Template '{}' requires a value for '{}'",
                self.id, missing
            )));
        }

        let placeholder = Regex::new(PLACEHOLDER_PATTERN).map_err(|e| Error::Other(e.to_string()))?;
        let rendered = placeholder.replace_all(&self.template, |caps: &Captures| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });

        Ok(rendered.into_owned())
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// Ordering of template search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSort {
    Name,
    #[default]
    Usage,
    Rating,
}

impl TemplateSort {
    /// Parse from string
    pub fn parse(s: &str) -> Option<TemplateSort> {
        match s.to_lowercase().as_str() {
            "name" => Some(TemplateSort::Name),
            "usage" => Some(TemplateSort::Usage),
            "rating" => Some(TemplateSort::Rating),
            _ => None,
        }
    }
}

/// Filter and ordering for [`TemplateLibrary::search`]
#[derive(Debug, Clone, Default)]
pub struct TemplateQuery {
    pub search: String,
    /// `None` or `"All"` matches every category
    pub category: Option<String>,
    pub sort: TemplateSort,
}

/// Collection of prompt templates
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    templates: Vec<PromptTemplate>,
}

impl TemplateLibrary {
    /// Create a library from an explicit list
    pub fn new(templates: Vec<PromptTemplate>) -> Self {
        Self { templates }
    }

    /// The templates shipped with promptlab
    pub fn builtin() -> Self {
        let entries = [
            (
                "explain-concept",
                "Concept Explanation",
                "Educational",
                "Explain {concept} in simple terms that a {audience} would understand. Include {examples} real-world examples and explain why it matters.",
                "Template for explaining complex concepts to different audiences",
                &["concept", "audience", "examples"][..],
                &["education", "explanation", "teaching"][..],
                45,
                4.2,
            ),
            (
                "creative-writing",
                "Creative Story Generator",
                "Creative",
                "Write a {genre} story about {character} who {situation}. The story should be {length} and have a {tone} tone. Include dialogue and vivid descriptions.",
                "Generate creative stories with specific parameters",
                &["genre", "character", "situation", "length", "tone"][..],
                &["creative", "story", "writing", "fiction"][..],
                32,
                4.5,
            ),
            (
                "technical-analysis",
                "Technical Analysis",
                "Technical",
                "Analyze the {technology} and explain its {aspects}. Compare it with {alternatives} and discuss the pros and cons. Provide recommendations for {use_case}.",
                "Deep dive into technical topics with comparative analysis",
                &["technology", "aspects", "alternatives", "use_case"][..],
                &["technical", "analysis", "comparison", "recommendation"][..],
                28,
                4.1,
            ),
            (
                "problem-solving",
                "Problem Solving Framework",
                "Business",
                "I have a problem: {problem_description}. Help me break this down using a structured approach. Identify the root causes, potential solutions, and create an action plan with {timeline}.",
                "Structured approach to problem-solving with actionable outcomes",
                &["problem_description", "timeline"][..],
                &["problem-solving", "business", "strategy", "planning"][..],
                67,
                4.7,
            ),
            (
                "code-review",
                "Code Review Assistant",
                "Development",
                "Review this {language} code and provide feedback on: {review_aspects}. Suggest improvements for performance, readability, and best practices. Code: {code_snippet}",
                "Comprehensive code review with improvement suggestions",
                &["language", "review_aspects", "code_snippet"][..],
                &["development", "code-review", "programming", "best-practices"][..],
                89,
                4.3,
            ),
            (
                "market-research",
                "Market Research Query",
                "Business",
                "Conduct market research for {product_service} in the {industry} industry. Focus on {research_areas}. Provide insights on target audience, competition, and market opportunities.",
                "Comprehensive market research template for business analysis",
                &["product_service", "industry", "research_areas"][..],
                &["market-research", "business", "analysis", "strategy"][..],
                23,
                4.0,
            ),
        ];

        let templates = entries
            .into_iter()
            .map(
                |(id, name, category, template, description, variables, tags, usage_count, average_rating)| {
                    PromptTemplate {
                        id: id.to_string(),
                        name: name.to_string(),
                        category: category.to_string(),
                        template: template.to_string(),
                        description: description.to_string(),
                        variables: variables.iter().map(|s| s.to_string()).collect(),
                        tags: tags.iter().map(|s| s.to_string()).collect(),
                        usage_count,
                        average_rating,
                    }
                },
            )
            .collect();

        Self { templates }
    }

    /// Get a template by id
    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// "All" followed by each distinct category, in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec!["All".to_string()];
        for template in &self.templates {
            if !categories.contains(&template.category) {
                categories.push(template.category.clone());
            }
        }
        categories
    }

    /// Filter by search text and category, then sort
    pub fn search(&self, query: &TemplateQuery) -> Vec<&PromptTemplate> {
        let needle = query.search.to_lowercase();
        let mut results: Vec<&PromptTemplate> = self
            .templates
            .iter()
            .filter(|t| t.matches_search(&needle))
            .filter(|t| match query.category.as_deref() {
                None | Some("All") => true,
                Some(category) => t.category == category,
            })
            .collect();

        match query.sort {
            TemplateSort::Name => results.sort_by(|a, b| a.name.cmp(&b.name)),
            TemplateSort::Usage => results.sort_by(|a, b| b.usage_count.cmp(&a.usage_count)),
            TemplateSort::Rating => results.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating)),
        }

        results
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}
