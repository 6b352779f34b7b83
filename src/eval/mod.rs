//! Evaluation framework: Recall@K for retrieval, BLEU for generation, dataset loading.

pub mod bleu;
pub mod dataset;
pub mod metrics;
pub mod observer;
pub mod scorer;

/// Document identifier used in retrieval rankings and ground truth.
pub type DocId = u64;

pub use bleu::{tokenize, Bleu};
pub use dataset::EvalDataset;
pub use metrics::{mean, recall_at_k};
pub use observer::{LogObserver, Metric, ScoreObserver};
pub use scorer::{evaluate_generation, evaluate_retrieval, GenerationScorer, RetrievalScorer};
