//! Confidence analysis entry points shared by live requests and precompute runs

mod analyzer;
mod budget;

pub use analyzer::Analyzer;
pub use budget::CallBudget;
