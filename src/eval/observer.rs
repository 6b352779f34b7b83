//! Per-query score reporting. Scorers send each score to an injected observer.

use std::fmt;

/// Which metric a recorded score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Recall with the cutoff rank used.
    RecallAtK(usize),
    Bleu,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::RecallAtK(k) => write!(f, "Recall@{}", k),
            Metric::Bleu => write!(f, "BLEU score"),
        }
    }
}

/// Receives one score per evaluated query.
pub trait ScoreObserver: Send + Sync {
    fn record(&self, metric: Metric, query: &str, score: f64);
}

/// Default observer: one info line per query through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ScoreObserver for LogObserver {
    fn record(&self, metric: Metric, query: &str, score: f64) {
        log::info!("{} for {}: {:.6}", metric, query, score);
    }
}
