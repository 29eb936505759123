use hud_oracle::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrecomputeError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no code states to precompute")]
    NoCodeStates,
}
