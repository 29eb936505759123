//! Oracle failure taxonomy

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("oracle API token is not configured; set CEREBRAS_API_TOKEN")]
    NotConfigured,

    #[error("oracle request failed: {0}")]
    Transport(String),

    #[error("oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed oracle response: {0}")]
    Malformed(String),
}

/// What a caller should substitute for a failed oracle call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The oracle cannot work at all; stop and report
    Fatal,
    /// Transient failure; batch callers assume a confident prediction
    AssumeConfident,
    /// The call went through but carried no distribution; treat as empty
    NoData,
}

impl OracleError {
    pub fn recovery(&self) -> Recovery {
        match self {
            OracleError::NotConfigured => Recovery::Fatal,
            OracleError::Transport(_) | OracleError::Status { .. } => Recovery::AssumeConfident,
            OracleError::Malformed(_) => Recovery::NoData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_by_kind() {
        assert_eq!(OracleError::NotConfigured.recovery(), Recovery::Fatal);
        assert_eq!(
            OracleError::Transport("timed out".into()).recovery(),
            Recovery::AssumeConfident
        );
        assert_eq!(
            OracleError::Status {
                status: 429,
                body: "slow down".into()
            }
            .recovery(),
            Recovery::AssumeConfident
        );
        assert_eq!(
            OracleError::Malformed("no choices".into()).recovery(),
            Recovery::NoData
        );
    }

    #[test]
    fn test_error_display() {
        let err = OracleError::Status {
            status: 503,
            body: "down".into(),
        };
        assert_eq!(err.to_string(), "oracle returned status 503: down");
    }
}
