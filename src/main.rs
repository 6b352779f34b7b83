//! Evaluation CLI: score precomputed retrieval rankings (Recall@K) and generated
//! answers (BLEU), then check the configured thresholds.

use anyhow::{Context, Result};
use clap::Parser;
use rageval::{Config, EvalDataset, GenerationScorer, RetrievalScorer};
use std::path::{Path, PathBuf};

/// Score a RAG evaluation dataset.
#[derive(Parser, Debug)]
#[command(name = "rageval", version)]
struct Args {
    /// Config file (default: $RAGEVAL_CONFIG, then ./config.toml, then built-in defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset JSON (overrides rageval.dataset_path).
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Cutoff rank for Recall@K (overrides retrieval.k).
    #[arg(short, long)]
    k: Option<usize>,
}

fn load_config(args: &Args) -> Result<Config> {
    // .env is optional; it must be loaded before RAGEVAL_CONFIG and RUST_LOG are read
    let _ = dotenv::dotenv();

    if let Some(path) = &args.config {
        return Config::load_from(path);
    }
    if std::env::var_os("RAGEVAL_CONFIG").is_some() || Path::new("config.toml").exists() {
        return Config::load();
    }
    Ok(Config::default())
}

/// Threshold violations, one message per failing metric.
fn threshold_failures(config: &Config, recall: f64, bleu: f64) -> Vec<String> {
    let mut failures = Vec::new();
    if let Some(min) = config.thresholds.min_recall {
        if recall < min {
            failures.push(format!("Recall@K {:.4} < {:.4}", recall, min));
        }
    }
    if let Some(min) = config.thresholds.min_bleu {
        if bleu < min {
            failures.push(format!("BLEU {:.4} < {:.4}", bleu, min));
        }
    }
    failures
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.rageval.log_level.as_str()),
    )
    .init();

    let k = args.k.unwrap_or(config.retrieval.k);
    if k == 0 {
        anyhow::bail!("k must be greater than 0");
    }

    let dataset_path = args
        .dataset
        .clone()
        .unwrap_or_else(|| config.dataset_path().to_path_buf());
    let dataset = EvalDataset::load(&dataset_path)
        .with_context(|| format!("Failed to load dataset {}", dataset_path.display()))?;

    log::info!(
        "Loaded {} ground-truth queries and {} generated answers from {}",
        dataset.ground_truth.len(),
        dataset.generated_texts.len(),
        dataset_path.display()
    );
    for warning in dataset.validate() {
        log::warn!("{}", warning);
    }
    for (query, ids) in &dataset.retrieval_results {
        for id in ids.iter().take(k) {
            if let Some(text) = dataset.document(*id) {
                log::debug!("{} retrieved {}: {}", query, id, text);
            }
        }
    }

    let recall = RetrievalScorer::new(k)
        .evaluate(&dataset.retrieval_results, &dataset.ground_truth)
        .context("Retrieval evaluation failed")?;
    let bleu = GenerationScorer::new(config.bleu()?)
        .evaluate(&dataset.generated_texts, &dataset.reference_texts)
        .context("Generation evaluation failed")?;

    log::info!("Final Recall@K: {:.6}", recall);
    log::info!("Final BLEU Score: {:.6}", bleu);

    let failures = threshold_failures(&config, recall, bleu);
    if failures.is_empty() {
        std::process::exit(0);
    }
    for failure in &failures {
        log::error!("Below threshold: {}", failure);
    }
    std::process::exit(1);
}
