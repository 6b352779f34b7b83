//! Evaluation dataset: precomputed retrieval rankings, ground truth, generated answers
//! and reference answers, loaded from JSON.

use crate::error::Result;
use crate::eval::DocId;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// All tables needed to score one evaluation run. Every field is optional in JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvalDataset {
    /// Document text by id. Only used for validation and debug output.
    #[serde(default)]
    pub documents: BTreeMap<DocId, String>,
    /// Ranked document ids returned for each query.
    #[serde(default)]
    pub retrieval_results: BTreeMap<String, Vec<DocId>>,
    /// Relevant document ids for each query.
    #[serde(default)]
    pub ground_truth: BTreeMap<String, Vec<DocId>>,
    /// Generated answer for each query.
    #[serde(default)]
    pub generated_texts: BTreeMap<String, String>,
    /// Expected answer for each query.
    #[serde(default)]
    pub reference_texts: BTreeMap<String, String>,
}

impl EvalDataset {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Text of a document, if known.
    pub fn document(&self, id: DocId) -> Option<&str> {
        self.documents.get(&id).map(String::as_str)
    }

    /// Lenient consistency checks. Scoring tolerates all of these, so they are
    /// returned as warnings rather than errors.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.documents.is_empty() {
            for (query, ids) in &self.retrieval_results {
                for id in ids.iter().filter(|id| !self.documents.contains_key(*id)) {
                    warnings.push(format!("retrieval result for {} references unknown document {}", query, id));
                }
            }
            for (query, ids) in &self.ground_truth {
                for id in ids.iter().filter(|id| !self.documents.contains_key(*id)) {
                    warnings.push(format!("ground truth for {} references unknown document {}", query, id));
                }
            }
        }

        for query in self.ground_truth.keys() {
            if !self.retrieval_results.contains_key(query) {
                warnings.push(format!("no retrieval results for {} (recall will be 0)", query));
            }
        }
        for query in self.generated_texts.keys() {
            if !self.reference_texts.contains_key(query) {
                warnings.push(format!("no reference text for {} (scored against empty text)", query));
            }
        }

        warnings
    }
}
