//! Terminal rendering for the CLI

use chrono::{DateTime, Utc};
use colored::*;
use crossterm::terminal::size;

use promptlab_core::{
    Evaluation, Impact, Metric, PromptAnalysisReport, PromptTemplate, ScoreGrade, ScoreMap,
};

use crate::session::ComparisonOutcome;

/// Shown in place of a response that is empty after cleaning
pub const EMPTY_RESPONSE_PLACEHOLDER: &str = "No response generated";

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(60, terminal_width.saturating_sub(4)).max(24);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));

    println!();
    println!("{}", top_border.blue());
    for line in ["promptlab", "Compare models, score prompts, keep feedback"] {
        let padding = (banner_width - 4).saturating_sub(line.chars().count());
        println!("{}", format!("│ {}{} │", line, " ".repeat(padding)).blue());
    }
    println!("{}", bottom_border.blue());
    println!();
}

/// Text to show for a cleaned response
pub fn display_text(cleaned: &str) -> &str {
    if cleaned.is_empty() {
        EMPTY_RESPONSE_PLACEHOLDER
    } else {
        cleaned
    }
}

/// Five stars, filled up to `rating`
pub fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{} {}/5", "★".repeat(filled), "☆".repeat(5 - filled), rating)
}

fn colored_score(report: &PromptAnalysisReport) -> ColoredString {
    let text = format!("{}/100", report.score);
    match report.grade() {
        ScoreGrade::Strong => text.green().bold(),
        ScoreGrade::Fair => text.yellow().bold(),
        ScoreGrade::Weak => text.red().bold(),
    }
}

fn colored_impact(impact: Impact) -> ColoredString {
    let text = format!("{:?} Impact", impact);
    match impact {
        Impact::High => text.red(),
        Impact::Medium => text.yellow(),
        Impact::Low => text.blue(),
    }
}

/// Render a prompt analysis report
pub fn render_report(report: &PromptAnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "Prompt score:".bold(), colored_score(report)));

    if report.issues.is_empty() {
        out.push_str(&format!("\n{}\n", "No issues detected".green()));
    } else {
        out.push_str(&format!("\n{}\n", "Issues".bold()));
        for issue in &report.issues {
            out.push_str(&format!(
                "  {} {} ({})\n    {}\n",
                "•".yellow(),
                issue.title.bold(),
                colored_impact(issue.impact),
                issue.description
            ));
        }
    }

    out.push_str(&format!("\n{}\n", "Suggested prompts".bold()));
    for (i, improvement) in report.improvements.iter().enumerate() {
        out.push_str(&format!(
            "\n  {} {}\n    {}\n",
            format!("[{}]", i + 1).cyan(),
            improvement.title.bold(),
            improvement.description.dimmed()
        ));
        for line in improvement.optimized.lines() {
            out.push_str(&format!("    │ {}\n", line));
        }
    }

    out
}

fn render_badge(metric: Metric, scores: &ScoreMap, model: &str) -> Option<String> {
    let score = *scores.get(model)?;
    let verdict = metric.verdict(score);
    let status = if verdict.healthy {
        verdict.label.green()
    } else {
        verdict.label.red()
    };
    Some(format!("{} {:.2} • {}", metric.display_name().dimmed(), score, status))
}

/// Render the responses of a comparison, one block per model
pub fn render_outcome(outcome: &ComparisonOutcome) -> String {
    let mut out = String::new();
    let metrics = outcome.evaluation.metrics.clone().unwrap_or_default();

    for (model, cleaned) in &outcome.cleaned {
        out.push_str(&format!("\n{} {}\n", "▌".blue(), model.bold()));
        out.push_str(display_text(cleaned));
        out.push('\n');

        let badges: Vec<String> = Metric::all()
            .into_iter()
            .filter_map(|metric| {
                let scores = match metric {
                    Metric::Safety => &metrics.toxicity,
                    Metric::Readability => &metrics.readability,
                    Metric::Length => &metrics.length,
                };
                render_badge(metric, scores, model)
            })
            .collect();
        if !badges.is_empty() {
            out.push_str(&format!("  {}\n", badges.join("   ")));
        }
    }

    for metric in &outcome.failed_metrics {
        out.push_str(&format!(
            "\n{} {} evaluation failed, but responses were generated\n",
            "⚠️".yellow(),
            metric
        ));
    }

    out
}

fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", head)
}

/// Render the history list, newest first
pub fn render_history(evaluations: &[Evaluation]) -> String {
    if evaluations.is_empty() {
        return format!("{}\n", "No evaluations yet".dimmed());
    }

    let mut out = String::new();
    for (index, evaluation) in evaluations.iter().enumerate() {
        let rating = evaluation
            .average_rating()
            .map(|avg| format!("avg {:.1}★", avg))
            .unwrap_or_else(|| "unrated".to_string());
        out.push_str(&format!(
            "{} {}  {}  {} models, {}\n",
            format!("[{}]", index).cyan(),
            format_timestamp(evaluation.timestamp).dimmed(),
            truncate(&evaluation.prompt, 60),
            evaluation.responses.len(),
            rating
        ));
    }
    out
}

/// Render one evaluation with its feedback
pub fn render_evaluation(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "Prompt:".bold(), evaluation.prompt));
    out.push_str(&format!("{} {}\n", "When:".bold(), format_timestamp(evaluation.timestamp)));
    if !evaluation.image_url.is_empty() {
        out.push_str(&format!("{} {}\n", "Image:".bold(), evaluation.image_url));
    }

    for (model, response) in &evaluation.responses {
        out.push_str(&format!("\n{} {}\n", "▌".blue(), model.bold()));
        out.push_str(response);
        out.push('\n');
        if let Some(rating) = evaluation.ratings.get(model) {
            out.push_str(&format!("  {}\n", stars(*rating).yellow()));
        }
        if let Some(comment) = evaluation.comments.get(model) {
            out.push_str(&format!("  {} {}\n", "💬".cyan(), comment));
        }
    }
    out
}

/// Render the category bar, highlighting the selected one ("All" when none)
pub fn render_categories(categories: &[String], selected: Option<&str>) -> String {
    let selected = selected.unwrap_or("All");
    let labels: Vec<String> = categories
        .iter()
        .map(|category| {
            if category == selected {
                format!("[{}]", category).cyan().bold().to_string()
            } else {
                category.dimmed().to_string()
            }
        })
        .collect();
    format!("{} {}\n\n", "Categories:".bold(), labels.join("  "))
}

/// Render template search results
pub fn render_templates(templates: &[&PromptTemplate]) -> String {
    if templates.is_empty() {
        return format!("{}\n", "No templates found".dimmed());
    }

    let mut out = String::new();
    for template in templates {
        out.push_str(&format!(
            "{} {} {}\n  {}\n  {} {}   {} {}   {:.1}★\n",
            template.name.bold(),
            format!("({})", template.id).dimmed(),
            format!("[{}]", template.category).cyan(),
            template.description,
            "vars:".dimmed(),
            template.variables.join(", "),
            "uses:".dimmed(),
            template.usage_count,
            template.average_rating
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_core::{EvaluationMetrics, ModelResponses, PromptAnalyzer, TemplateLibrary, TemplateQuery};

    fn outcome() -> ComparisonOutcome {
        let mut responses = ModelResponses::new();
        responses.insert("alpha".to_string(), "Human: hi\nHello there".to_string());
        responses.insert("beta".to_string(), "   ".to_string());

        let mut cleaned = ModelResponses::new();
        cleaned.insert("alpha".to_string(), "Hello there".to_string());
        cleaned.insert("beta".to_string(), String::new());

        let mut metrics = EvaluationMetrics::default();
        metrics.toxicity.insert("alpha".to_string(), 0.8);
        metrics.readability.insert("alpha".to_string(), 0.7);

        ComparisonOutcome {
            evaluation: Evaluation {
                id: "x".to_string(),
                prompt: "hi".to_string(),
                image_url: String::new(),
                responses,
                ratings: Default::default(),
                comments: Default::default(),
                timestamp: 0,
                prompt_version: None,
                metrics: Some(metrics),
            },
            cleaned,
            failed_metrics: vec![Metric::Length],
        }
    }

    #[test]
    fn test_display_text_placeholder() {
        assert_eq!(display_text(""), EMPTY_RESPONSE_PLACEHOLDER);
        assert_eq!(display_text("ok"), "ok");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆ 3/5");
        assert_eq!(stars(5), "★★★★★ 5/5");
    }

    #[test]
    fn test_render_report_lists_issues_and_prompts() {
        let report = PromptAnalyzer::new().analyze("Hi");
        let text = render_report(&report);

        assert!(text.contains("60/100"));
        assert!(text.contains("Too Brief"));
        assert!(text.contains("Unclear Intent"));
        assert!(text.contains("Enhanced Structure"));
        assert!(text.contains("│ 4. Summary or conclusion"));
    }

    #[test]
    fn test_render_outcome() {
        let text = render_outcome(&outcome());

        assert!(text.contains("Hello there"));
        assert!(text.contains(EMPTY_RESPONSE_PLACEHOLDER));
        assert!(text.contains("Potentially Toxic"));
        assert!(text.contains("Easy to Read"));
        assert!(text.contains("Length evaluation failed"));
    }

    #[test]
    fn test_render_history() {
        let mut evaluation = outcome().evaluation;
        evaluation.ratings.insert("alpha".to_string(), 4);

        let text = render_history(&[evaluation]);
        assert!(text.contains("1970-01-01 00:00"));
        assert!(text.contains("2 models"));
        assert!(text.contains("avg 4.0★"));
        assert!(render_history(&[]).contains("No evaluations yet"));
    }

    #[test]
    fn test_render_evaluation_shows_feedback() {
        let mut evaluation = outcome().evaluation;
        evaluation.ratings.insert("alpha".to_string(), 2);
        evaluation.comments.insert("alpha".to_string(), "too short".to_string());

        let text = render_evaluation(&evaluation);
        assert!(text.contains("★★☆☆☆ 2/5"));
        assert!(text.contains("too short"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_render_categories_marks_selection() {
        let categories = TemplateLibrary::builtin().categories();

        let text = render_categories(&categories, None);
        assert!(text.contains("Categories:"));
        assert!(text.contains("[All]"));
        assert!(text.contains("Development"));

        let text = render_categories(&categories, Some("Development"));
        assert!(text.contains("[Development]"));
        assert!(!text.contains("[All]"));
    }

    #[test]
    fn test_render_templates() {
        let library = TemplateLibrary::builtin();
        let results = library.search(&TemplateQuery::default());
        let text = render_templates(&results);
        assert!(text.contains("Code Review Assistant"));
        assert!(text.contains("language, review_aspects, code_snippet"));
        assert!(render_templates(&[]).contains("No templates found"));
    }
}
