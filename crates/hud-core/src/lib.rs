//! Tokenizer, metric engine and candidate selection for next-token confidence analysis

mod config;
pub mod metrics;
pub mod prefix;
pub mod selector;
mod tokenizer;
mod types;

pub use config::{EngineConfig, Pacing};
pub use prefix::CursorKey;
pub use selector::{SaliencyCandidate, TokenSampling};
pub use tokenizer::{tokenize, Tokens};
pub use types::{
    AutopanicResult, Distribution, EntropyResult, FileProbs, GhostResult, LineProbs,
    SaliencyBatch, SaliencyResult, TokenProb, TokenRank, TokenSpan,
};

/// Log-probability assumed for tokens the oracle was not (or could not be) asked about
pub const CONFIDENT_LOGPROB: f64 = -0.1;

/// Log-probability recorded when the observed token is missing from the top-K
pub const NOT_FOUND_LOGPROB: f64 = -5.0;
