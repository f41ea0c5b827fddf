// ABOUTME: Entry point for the floe binary.
// ABOUTME: Parses CLI arguments, initializes tracing, and exercises the assistance layer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use floe_assist::tasks::SubmissionDraft;
use floe_assist::tasks::classify::ClassifyTask;
use floe_assist::tasks::keywords::{KeywordsInput, KeywordsTask};
use floe_assist::tasks::prefill::PrefillTask;
use floe_assist::tasks::quality::QualityTask;
use floe_assist::tasks::title::{TitleInput, TitleTask};
use floe_assist::{AnswerEngine, AssistConfig, Assistant, ProviderGateway, QueryTranslator};
use floe_core::taxonomy::ExpeditionType;
use floe_core::{DatasetRecord, MemoryIndex};

#[derive(Parser)]
#[command(name = "floe", about = "AI assistance layer for the Floe polar data portal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show gateway state and configured providers.
    Status,
    /// Translate a natural-language query into filter predicates.
    Query { text: String },
    /// Translate a query and run it against a JSON dataset file, with
    /// zero-result recovery.
    Search {
        text: String,
        #[arg(long)]
        data: PathBuf,
    },
    /// Ask a free-text question grounded in the dataset corpus.
    Ask {
        question: String,
        #[arg(long)]
        data: PathBuf,
    },
    /// Classify a dataset draft into category, topic, and ISO topic.
    Classify {
        #[arg(long)]
        title: String,
        #[arg(long = "abstract")]
        abstract_text: String,
        #[arg(long)]
        expedition: Option<String>,
    },
    /// Suggest GCMD-style keywords for a dataset draft.
    Keywords {
        #[arg(long)]
        title: String,
        #[arg(long = "abstract")]
        abstract_text: String,
    },
    /// Score the quality of a dataset abstract.
    Quality {
        #[arg(long)]
        title: String,
        #[arg(long = "abstract")]
        abstract_text: String,
    },
    /// Draft a dataset title from an abstract.
    Title {
        #[arg(long = "abstract")]
        abstract_text: String,
        #[arg(long)]
        expedition: Option<String>,
    },
    /// Pre-fill the whole submission form from title and abstract.
    Prefill {
        #[arg(long)]
        title: String,
        #[arg(long = "abstract")]
        abstract_text: String,
        #[arg(long)]
        expedition: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "floe=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let config = AssistConfig::from_env()?;
    let gateway = Arc::new(ProviderGateway::from_config(&config));
    let assistant = Assistant::new(Arc::clone(&gateway));

    match cli.command {
        Command::Status => {
            println!(
                "{}",
                serde_json::json!({
                    "state": if gateway.is_disabled() { "disabled" } else { "available" },
                    "providers": gateway.provider_names(),
                })
            );
        }
        Command::Query { text } => {
            let translator =
                QueryTranslator::new(assistant, Arc::new(MemoryIndex::new(Vec::new())));
            print_json(&translator.translate(&text).await)?;
        }
        Command::Search { text, data } => {
            let translator = QueryTranslator::new(assistant, load_index(&data)?);
            print_json(&translator.search(&text).await)?;
        }
        Command::Ask { question, data } => {
            let engine = AnswerEngine::new(assistant, load_index(&data)?);
            print_json(&engine.answer(&question).await)?;
        }
        Command::Classify {
            title,
            abstract_text,
            expedition,
        } => {
            let draft = SubmissionDraft::new(title, abstract_text, parse_expedition(expedition)?);
            print_json(&assistant.run::<ClassifyTask>(&draft).await)?;
        }
        Command::Keywords {
            title,
            abstract_text,
        } => {
            let input = KeywordsInput {
                draft: SubmissionDraft::new(title, abstract_text, None),
                category: None,
            };
            print_json(&assistant.run::<KeywordsTask>(&input).await)?;
        }
        Command::Quality {
            title,
            abstract_text,
        } => {
            let draft = SubmissionDraft::new(title, abstract_text, None);
            print_json(&assistant.run::<QualityTask>(&draft).await)?;
        }
        Command::Title {
            abstract_text,
            expedition,
        } => {
            let input = TitleInput {
                abstract_text,
                expedition: parse_expedition(expedition)?,
            };
            print_json(&assistant.run::<TitleTask>(&input).await)?;
        }
        Command::Prefill {
            title,
            abstract_text,
            expedition,
        } => {
            let draft = SubmissionDraft::new(title, abstract_text, parse_expedition(expedition)?);
            print_json(&assistant.run::<PrefillTask>(&draft).await)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_index(path: &PathBuf) -> anyhow::Result<Arc<MemoryIndex>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file {}", path.display()))?;
    let records: Vec<DatasetRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse dataset records from {}", path.display()))?;
    tracing::info!(count = records.len(), "loaded dataset records");
    Ok(Arc::new(MemoryIndex::new(records)))
}

fn parse_expedition(key: Option<String>) -> anyhow::Result<Option<ExpeditionType>> {
    match key {
        None => Ok(None),
        Some(key) => ExpeditionType::from_key(&key)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("unknown expedition type: {key}")),
    }
}
