use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use colored::*;
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use promptlab_backend::HttpBackend;
use promptlab_cli::{
    display_banner, render_categories, render_evaluation, render_history, render_outcome,
    render_report, render_templates, ComparisonSession, JsonHistoryStore, DEFAULT_HISTORY_FILE,
};
use promptlab_core::{
    EvaluationBackend, Feedback, HistoryStore, PromptAnalyzer, ResponseNormalizer,
    TemplateLibrary, TemplateQuery, TemplateSort, TimeRange,
};

#[derive(Parser)]
#[command(name = "promptlab")]
#[command(about = "Compare language model responses, analyze prompts and collect feedback", long_about = None)]
struct Cli {
    /// Evaluation history file
    #[arg(long, global = true, default_value = DEFAULT_HISTORY_FILE)]
    history_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a prompt and suggest optimized versions
    Analyze {
        prompt: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Strip an echoed prompt from a model response (reads stdin when TEXT is omitted)
    Clean { text: Option<String> },
    /// Send a prompt to every model and score the responses
    Compare {
        prompt: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// List past evaluations or show one in full
    History {
        #[arg(long)]
        index: Option<usize>,
        /// Delete every recorded evaluation
        #[arg(long, conflicts_with = "index")]
        clear: bool,
    },
    /// Rate or comment on one model's response
    Feedback {
        index: usize,
        model: String,
        #[arg(long)]
        rating: Option<u8>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Browse the prompt template library
    Templates {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "usage", value_parser = parse_sort)]
        sort: TemplateSort,
    },
    /// Fill a template's variables
    Render {
        template_id: String,
        /// Variable value as key=value, repeatable
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
    /// Fetch the analytics bundle from the backend
    Analytics {
        #[arg(long, default_value = "7d", value_parser = parse_range)]
        range: TimeRange,
    },
}

fn parse_sort(s: &str) -> std::result::Result<TemplateSort, String> {
    TemplateSort::parse(s).ok_or_else(|| format!("unknown sort '{}', expected name, usage or rating", s))
}

fn parse_range(s: &str) -> std::result::Result<TimeRange, String> {
    TimeRange::parse(s).ok_or_else(|| format!("unknown range '{}', expected 7d, 30d or 90d", s))
}

fn parse_var(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        display_banner();
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Analyze { prompt, json } => {
            let report = PromptAnalyzer::new().analyze(&prompt);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        Commands::Clean { text } => {
            let raw = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            println!("{}", ResponseNormalizer::new().clean(&raw));
        }
        Commands::Compare { prompt, image_url } => {
            let backend = HttpBackend::from_env()?;
            let history = JsonHistoryStore::open(&cli.history_file).await?;
            let mut session = ComparisonSession::new(backend, history);

            println!("{} Generating responses...", "🤖".blue());
            let outcome = session
                .submit(&prompt, image_url.as_deref())
                .await
                .with_context(|| format!("Failed to generate responses. Is the backend running at {}?", session.backend().config().base_url))?;

            print!("{}", render_outcome(&outcome));
            println!(
                "\n{} Saved as evaluation [0]. Rate with: promptlab feedback 0 <MODEL> --rating 1-5",
                "✅".green()
            );
        }
        Commands::History { index, clear } => {
            let mut history = JsonHistoryStore::open(&cli.history_file).await?;
            if clear {
                history.clear().await?;
                println!("{} History cleared", "✅".green());
            } else if let Some(index) = index {
                let evaluation = history
                    .get(index)
                    .with_context(|| format!("No evaluation at index {}", index))?;
                print!("{}", render_evaluation(evaluation));
            } else {
                print!("{}", render_history(history.list()));
            }
        }
        Commands::Feedback {
            index,
            model,
            rating,
            comment,
        } => {
            if rating.is_none() && comment.is_none() {
                anyhow::bail!("Provide --rating and/or --comment");
            }
            let mut history = JsonHistoryStore::open(&cli.history_file).await?;
            history
                .save_feedback(index, &model, Feedback { rating, comment })
                .await?;
            println!("{} Feedback for {} saved!", "✅".green(), model);
        }
        Commands::Templates {
            search,
            category,
            sort,
        } => {
            let library = TemplateLibrary::builtin();
            let query = TemplateQuery { search, category, sort };
            print!("{}", render_categories(&library.categories(), query.category.as_deref()));
            print!("{}", render_templates(&library.search(&query)));
        }
        Commands::Render { template_id, vars } => {
            let library = TemplateLibrary::builtin();
            let template = library
                .get(&template_id)
                .with_context(|| format!("Unknown template '{}'", template_id))?;
            let values: HashMap<String, String> = vars.into_iter().collect();
            println!("{}", template.render(&values)?);
        }
        Commands::Analytics { range } => {
            let backend = HttpBackend::from_env()?;
            let bundle = backend.analytics(range).await?;
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
    }

    Ok(())
}
