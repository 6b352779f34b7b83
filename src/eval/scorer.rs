//! Query-level scorers: mean Recall@K over retrieval rankings and mean BLEU over
//! generated answers.

use crate::error::{RagevalError, Result};
use crate::eval::bleu::{tokenize, Bleu};
use crate::eval::metrics::{mean, recall_at_k};
use crate::eval::observer::{LogObserver, Metric, ScoreObserver};
use crate::eval::DocId;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const DEFAULT_K: usize = 2;

/// Mean Recall@K over every query in the ground truth.
#[derive(Clone)]
pub struct RetrievalScorer {
    k: usize,
    observer: Arc<dyn ScoreObserver>,
}

impl Default for RetrievalScorer {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl RetrievalScorer {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Ground truth drives the iteration: queries that only appear in `results` are
    /// ignored, and a ground-truth query without results scores 0.
    pub fn evaluate(
        &self,
        results: &BTreeMap<String, Vec<DocId>>,
        ground_truth: &BTreeMap<String, Vec<DocId>>,
    ) -> Result<f64> {
        let mut recalls = Vec::with_capacity(ground_truth.len());
        for (query, relevant) in ground_truth {
            let retrieved = results.get(query).map(Vec::as_slice).unwrap_or(&[]);
            let recall = recall_at_k(retrieved, relevant, self.k);
            self.observer.record(Metric::RecallAtK(self.k), query, recall);
            recalls.push(recall);
        }
        mean(&recalls).ok_or_else(|| RagevalError::EmptyInput("ground truth has no queries".to_string()))
    }
}

/// Mean sentence BLEU over every generated answer.
#[derive(Clone)]
pub struct GenerationScorer {
    bleu: Bleu,
    observer: Arc<dyn ScoreObserver>,
}

impl Default for GenerationScorer {
    fn default() -> Self {
        Self::new(Bleu::default())
    }
}

impl GenerationScorer {
    pub fn new(bleu: Bleu) -> Self {
        Self {
            bleu,
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn bleu(&self) -> &Bleu {
        &self.bleu
    }

    /// Generated texts drive the iteration; a query with no reference is scored
    /// against the empty string.
    pub fn evaluate(
        &self,
        generated: &BTreeMap<String, String>,
        reference: &BTreeMap<String, String>,
    ) -> Result<f64> {
        let mut scores = Vec::with_capacity(generated.len());
        for (query, generated_text) in generated {
            let reference_tokens = tokenize(reference.get(query).map(String::as_str).unwrap_or(""));
            let generated_tokens = tokenize(generated_text);
            let score = self.bleu.sentence_score(&reference_tokens, &generated_tokens);
            self.observer.record(Metric::Bleu, query, score);
            scores.push(score);
        }
        mean(&scores).ok_or_else(|| RagevalError::EmptyInput("no generated texts".to_string()))
    }
}

/// Mean Recall@K with the default observer.
pub fn evaluate_retrieval(
    results: &BTreeMap<String, Vec<DocId>>,
    ground_truth: &BTreeMap<String, Vec<DocId>>,
    k: usize,
) -> Result<f64> {
    RetrievalScorer::new(k).evaluate(results, ground_truth)
}

/// Mean BLEU (4-gram, epsilon 0.1) with the default observer.
pub fn evaluate_generation(
    generated: &BTreeMap<String, String>,
    reference: &BTreeMap<String, String>,
) -> Result<f64> {
    GenerationScorer::default().evaluate(generated, reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        records: Mutex<Vec<(Metric, String, f64)>>,
    }

    impl ScoreObserver for RecordingObserver {
        fn record(&self, metric: Metric, query: &str, score: f64) {
            self.records.lock().unwrap().push((metric, query.to_string(), score));
        }
    }

    fn doc_map(entries: Vec<(&str, Vec<DocId>)>) -> BTreeMap<String, Vec<DocId>> {
        entries
            .into_iter()
            .map(|(q, ids)| (q.to_string(), ids))
            .collect()
    }

    fn text_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(q, t)| (q.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn scorer_defaults() {
        assert_eq!(RetrievalScorer::default().k(), DEFAULT_K);
        assert_eq!(RetrievalScorer::new(5).k(), 5);
        let bleu = Bleu::new(2, 0.2).unwrap();
        assert_eq!(*GenerationScorer::new(bleu).bleu(), bleu);
        assert_eq!(*GenerationScorer::default().bleu(), Bleu::default());
    }

    #[test]
    fn single_query_full_recall() {
        let results = doc_map(vec![("q1", vec![1, 3])]);
        let truth = doc_map(vec![("q1", vec![1])]);
        let recall = evaluate_retrieval(&results, &truth, 2).unwrap();
        assert!((recall - 1.0).abs() < 1e-6);
    }

    #[test]
    fn two_queries_full_recall() {
        let results = doc_map(vec![("q1", vec![1, 3]), ("q2", vec![2, 3])]);
        let truth = doc_map(vec![("q1", vec![1]), ("q2", vec![2])]);
        let recall = evaluate_retrieval(&results, &truth, 2).unwrap();
        assert!((recall - 1.0).abs() < 1e-6);
    }

    #[test]
    fn missing_results_and_empty_relevant_score_zero() {
        let results = doc_map(vec![("q1", vec![1]), ("extra", vec![7])]);
        let truth = doc_map(vec![("q1", vec![1]), ("q2", vec![2]), ("q3", vec![])]);
        let observer = Arc::new(RecordingObserver::default());
        let scorer = RetrievalScorer::new(2).with_observer(observer.clone());
        let recall = scorer.evaluate(&results, &truth).unwrap();
        assert!((recall - 1.0 / 3.0).abs() < 1e-6);

        let records = observer.records.lock().unwrap();
        let queries: Vec<&str> = records.iter().map(|(_, q, _)| q.as_str()).collect();
        assert_eq!(queries, vec!["q1", "q2", "q3"]);
        assert!(records.iter().all(|(m, _, _)| *m == Metric::RecallAtK(2)));
        assert_eq!(records[1].2, 0.0);
        assert_eq!(records[2].2, 0.0);
    }

    #[test]
    fn larger_k_never_lowers_mean_recall() {
        let results = doc_map(vec![("q1", vec![5, 1, 2]), ("q2", vec![9, 8, 3])]);
        let truth = doc_map(vec![("q1", vec![1, 2]), ("q2", vec![3])]);
        let at_1 = evaluate_retrieval(&results, &truth, 1).unwrap();
        let at_2 = evaluate_retrieval(&results, &truth, 2).unwrap();
        let at_3 = evaluate_retrieval(&results, &truth, 3).unwrap();
        assert!(at_1 <= at_2 && at_2 <= at_3);
        assert!((at_3 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_ground_truth_is_an_error() {
        let results = doc_map(vec![("q1", vec![1])]);
        let err = evaluate_retrieval(&results, &BTreeMap::new(), 2).unwrap_err();
        assert!(matches!(err, RagevalError::EmptyInput(_)));
    }

    #[test]
    fn identical_generation_scores_one() {
        let generated = text_map(&[("q1", "Flintoff named England Lions head coach.")]);
        let reference = generated.clone();
        let bleu = evaluate_generation(&generated, &reference).unwrap();
        assert!((bleu - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sample_generation_is_partial() {
        let generated = text_map(&[
            ("query1", "Andrew Flintoff is the Head Coach of Lions Cricket Club."),
            ("query2", "Supreme Court urged Doctors to start the work."),
        ]);
        let reference = text_map(&[
            ("query1", "Flintoff named England Lions head coach."),
            (
                "query2",
                "Supreme Court slams Kolkata police for delay in registering FIR; doctors are told to join work.",
            ),
        ]);
        let observer = Arc::new(RecordingObserver::default());
        let scorer = GenerationScorer::default().with_observer(observer.clone());
        let bleu = scorer.evaluate(&generated, &reference).unwrap();
        assert!(bleu > 0.0 && bleu < 1.0, "bleu = {}", bleu);

        let records = observer.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        let per_query_mean = records.iter().map(|(_, _, s)| s).sum::<f64>() / 2.0;
        assert!((per_query_mean - bleu).abs() < 1e-12);
        assert!(records.iter().all(|(m, _, s)| *m == Metric::Bleu && *s > 0.0 && *s < 1.0));
    }

    #[test]
    fn missing_reference_scores_zero() {
        let generated = text_map(&[("q1", "some generated answer")]);
        let bleu = evaluate_generation(&generated, &BTreeMap::new()).unwrap();
        assert_eq!(bleu, 0.0);
    }

    #[test]
    fn empty_generated_is_an_error() {
        let reference = text_map(&[("q1", "reference")]);
        let err = evaluate_generation(&BTreeMap::new(), &reference).unwrap_err();
        assert!(matches!(err, RagevalError::EmptyInput(_)));
    }

    #[test]
    fn scorers_can_be_shared_across_threads() {
        let scorer = Arc::new(RetrievalScorer::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scorer = Arc::clone(&scorer);
                std::thread::spawn(move || {
                    let results = doc_map(vec![("q1", vec![1, 3])]);
                    let truth = doc_map(vec![("q1", vec![1])]);
                    scorer.evaluate(&results, &truth).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!((handle.join().unwrap() - 1.0).abs() < 1e-6);
        }
    }
}
