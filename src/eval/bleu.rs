//! Sentence-level BLEU against a single reference, with epsilon ("method1") smoothing.

use crate::error::{RagevalError, Result};
use std::collections::HashMap;

pub const DEFAULT_MAX_NGRAM: usize = 4;
pub const DEFAULT_EPSILON: f64 = 0.1;

/// BLEU settings: highest n-gram order (uniform weights) and the smoothing epsilon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bleu {
    max_ngram: usize,
    epsilon: f64,
}

impl Default for Bleu {
    fn default() -> Self {
        Self {
            max_ngram: DEFAULT_MAX_NGRAM,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Lower-case and split on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

fn ngram_counts<T: AsRef<str>>(tokens: &[T], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut counts = HashMap::new();
    if tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        let gram: Vec<&str> = window.iter().map(|token| token.as_ref()).collect();
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram matches and the hypothesis n-gram total (at least 1).
fn modified_precision<T: AsRef<str>>(reference: &[T], hypothesis: &[T], n: usize) -> (usize, usize) {
    let hyp_counts = ngram_counts(hypothesis, n);
    let ref_counts = ngram_counts(reference, n);
    let clipped = hyp_counts
        .iter()
        .map(|(gram, &count)| count.min(ref_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total: usize = hyp_counts.values().sum();
    (clipped, total.max(1))
}

fn brevity_penalty(reference_len: usize, hypothesis_len: usize) -> f64 {
    if hypothesis_len > reference_len {
        1.0
    } else if hypothesis_len == 0 {
        0.0
    } else {
        (1.0 - reference_len as f64 / hypothesis_len as f64).exp()
    }
}

impl Bleu {
    pub fn new(max_ngram: usize, epsilon: f64) -> Result<Self> {
        if max_ngram == 0 {
            return Err(RagevalError::InvalidInput(
                "max_ngram must be greater than 0".to_string(),
            ));
        }
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(RagevalError::InvalidInput(format!(
                "smoothing epsilon must be a positive number, got {}",
                epsilon
            )));
        }
        Ok(Self { max_ngram, epsilon })
    }

    pub fn max_ngram(&self) -> usize {
        self.max_ngram
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// BLEU of an already tokenized hypothesis against one tokenized reference.
    ///
    /// Returns 0.0 when no unigram matches (this also covers an empty hypothesis or
    /// reference). Orders with zero matches use `epsilon / total` instead of zero.
    pub fn sentence_score<T: AsRef<str>>(&self, reference: &[T], hypothesis: &[T]) -> f64 {
        let precisions: Vec<(usize, usize)> = (1..=self.max_ngram)
            .map(|n| modified_precision(reference, hypothesis, n))
            .collect();

        if precisions[0].0 == 0 {
            return 0.0;
        }

        let weight = 1.0 / self.max_ngram as f64;
        let log_sum: f64 = precisions
            .iter()
            .map(|&(matches, total)| {
                let p = if matches == 0 {
                    self.epsilon / total as f64
                } else {
                    matches as f64 / total as f64
                };
                weight * p.ln()
            })
            .sum();

        brevity_penalty(reference.len(), hypothesis.len()) * log_sum.exp()
    }

    /// Tokenize both texts with [`tokenize`] and score them.
    pub fn score_text(&self, reference: &str, hypothesis: &str) -> f64 {
        self.sentence_score(&tokenize(reference), &tokenize(hypothesis))
    }
}
