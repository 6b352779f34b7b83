pub mod config;
pub mod error;
pub mod eval;

pub use config::Config;
pub use error::{RagevalError, Result};
pub use eval::{evaluate_generation, evaluate_retrieval, EvalDataset, GenerationScorer, RetrievalScorer};
