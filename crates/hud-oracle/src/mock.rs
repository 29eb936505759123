//! Offline oracle with canned answers

use crate::error::OracleError;
use crate::Oracle;
use hud_core::Distribution;
use std::sync::Mutex;

/// Deterministic oracle that never touches the network.
///
/// Answers with the canned distribution unless a suffix rule matches the
/// prompt or a blanket failure has been configured. Every prompt is recorded.
#[derive(Debug)]
pub struct MockOracle {
    canned: Distribution,
    rules: Vec<(String, Result<Distribution, OracleError>)>,
    failure: Option<OracleError>,
    prompts: Mutex<Vec<String>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::with_distribution(Distribution::from_pairs([
            ("\n", -0.9),
            (")", -1.6),
            (":", -1.9),
            (" return", -2.4),
            (" x", -2.8),
            (",", -3.1),
        ]))
    }

    pub fn with_distribution(canned: Distribution) -> Self {
        Self {
            canned,
            rules: Vec::new(),
            failure: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with `error`
    pub fn failing(error: OracleError) -> Self {
        let mut mock = Self::with_distribution(Distribution::new());
        mock.failure = Some(error);
        mock
    }

    /// Answer `dist` for prompts ending in `suffix`; earlier rules win
    pub fn when_prefix_ends_with(mut self, suffix: impl Into<String>, dist: Distribution) -> Self {
        self.rules.push((suffix.into(), Ok(dist)));
        self
    }

    /// Fail with `error` for prompts ending in `suffix`; earlier rules win
    pub fn fail_when_prefix_ends_with(
        mut self,
        suffix: impl Into<String>,
        error: OracleError,
    ) -> Self {
        self.rules.push((suffix.into(), Err(error)));
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn answer(&self, prefix: &str) -> Result<Distribution, OracleError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prefix.to_string());

        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        match self
            .rules
            .iter()
            .find(|(suffix, _)| prefix.ends_with(suffix.as_str()))
        {
            Some((_, answer)) => answer.clone(),
            None => Ok(self.canned.clone()),
        }
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for MockOracle {
    async fn predict(&self, prefix: &str) -> Result<Distribution, OracleError> {
        self.answer(prefix)
    }
}
