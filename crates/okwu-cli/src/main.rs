//! Okwu command line: completeness checks, a merge walkthrough, and the
//! dashboard recompute, all against the in-memory store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use okwu_assets::AssetStore;
use okwu_core::{
    DocumentId, ExamplePayload, UserId, WordClass, WordPayload, evaluate_example, evaluate_word,
};
use okwu_engine::{LifecycleService, MergeCoordinator, StatsAggregator};
use okwu_store::{DocumentStore, MemoryStore, SuggestionStore};

#[derive(Parser)]
#[command(name = "okwu", about = "Review and merge engine for the Okwu dictionary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a word payload read from a JSON file.
    EvaluateWord {
        /// Path to a JSON word payload.
        file: PathBuf,
    },

    /// Classify an example payload read from a JSON file.
    EvaluateExample {
        /// Path to a JSON example payload.
        file: PathBuf,
    },

    /// Walk a word suggestion through review and merge against the in-memory
    /// store, printing the resulting document.
    MergeDemo {
        /// Approvals required before a merge is accepted.
        #[arg(long, default_value_t = 2, env = "OKWU_APPROVAL_THRESHOLD")]
        approval_threshold: usize,
    },

    /// Seed demo documents, recompute the dashboard, and print every counter.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::EvaluateWord { file } => evaluate_word_file(&file),
        Commands::EvaluateExample { file } => evaluate_example_file(&file),
        Commands::MergeDemo { approval_threshold } => merge_demo(approval_threshold).await,
        Commands::Stats => stats().await,
    }
}

fn evaluate_word_file(file: &PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let payload: WordPayload =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
    print_evaluation(&payload.word, evaluate_word(&payload));
    Ok(())
}

fn evaluate_example_file(file: &PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let payload: ExamplePayload =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
    print_evaluation(&payload.igbo, evaluate_example(&payload));
    Ok(())
}

fn print_evaluation(subject: &str, evaluation: okwu_core::Evaluation) {
    println!("{subject}: {:?}", evaluation.tier);
    for requirement in &evaluation.complete_requirements {
        let marker = if evaluation.sufficient_requirements.contains(requirement) {
            "sufficient"
        } else {
            "complete"
        };
        println!("  missing ({marker}): {requirement}");
    }
}

async fn merge_demo(approval_threshold: usize) -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let assets = Arc::new(AssetStore::in_memory());
    let lifecycle = LifecycleService::new(store.clone());
    let coordinator = MergeCoordinator::new(store.clone(), assets.clone(), approval_threshold);

    let mut payload = WordPayload {
        word: "mmiri".into(),
        definitions: vec!["water".into()],
        word_class: Some(WordClass::NNC),
        ..Default::default()
    };
    payload.attributes.is_standard_igbo = true;
    payload.attributes.is_accented = true;

    let suggestion = lifecycle
        .submit_word(UserId::new("demo-author"), payload, None)
        .await?;
    let uri = assets
        .put(
            suggestion.id.as_str(),
            "data:audio/webm;base64,aWdibyBhdWRpbw==",
        )
        .await?;
    let mut suggestion = lifecycle
        .approve_word(&suggestion.id, UserId::new("reviewer-1"))
        .await?;
    suggestion.payload.pronunciation = Some(uri);
    store.put_word_suggestion(suggestion.clone()).await?;
    let suggestion = lifecycle
        .approve_word(&suggestion.id, UserId::new("reviewer-2"))
        .await?;

    let merged = coordinator
        .merge_word_suggestion(&suggestion.id, UserId::new("demo-merger"))
        .await?;

    println!("merged as {:?}", merged.evaluation.tier);
    println!("{}", serde_json::to_string_pretty(&merged.document)?);
    Ok(())
}

async fn stats() -> Result<()> {
    let store = Arc::new(MemoryStore::new());

    let mut water = WordPayload {
        word: "mmiri".into(),
        definitions: vec!["water".into()],
        word_class: Some(WordClass::NNC),
        nsibidi: "𑗊".into(),
        ..Default::default()
    };
    water.attributes.is_standard_igbo = true;
    water.attributes.is_accented = true;
    let word = water.into_word(DocumentId::allocate(), Utc::now());
    let word_id = word.id.clone();
    store.upsert_word(word).await?;

    let example = ExamplePayload {
        igbo: "mmiri dị ọcha".into(),
        english: "the water is clean".into(),
        associated_words: vec![word_id],
        ..Default::default()
    }
    .into_example(DocumentId::allocate(), Utc::now());
    store.upsert_example(example).await?;

    let aggregator = StatsAggregator::new(store.clone());
    let report = aggregator.recompute_dashboard().await;
    if !report.failed.is_empty() {
        tracing::warn!(failed = ?report.failed, "some counters failed to recompute");
    }

    for stat in aggregator.all_stats().await? {
        println!("{:<32} {}", stat.key.stat_type.value(), stat.value);
    }
    Ok(())
}
