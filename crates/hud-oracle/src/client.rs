//! HTTP completions client

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::mock::MockOracle;
use crate::Oracle;
use hud_core::Distribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Longest error body kept in an [`OracleError::Status`]
const MAX_ERROR_BODY: usize = 200;

/// Request body for the completions endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    /// Always 1: we want the distribution for the very next position only
    max_tokens: u32,
    logprobs: usize,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    logprobs: Option<Logprobs>,
}

#[derive(Debug, Deserialize)]
struct Logprobs {
    top_logprobs: Option<Vec<BTreeMap<String, f64>>>,
}

/// Extract the next-position distribution from a completions response body
pub fn parse_completion(body: &str) -> Result<Distribution, OracleError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| OracleError::Malformed(e.to_string()))?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| OracleError::Malformed("no choices".to_string()))?;
    let top_logprobs = choice
        .logprobs
        .and_then(|l| l.top_logprobs)
        .ok_or_else(|| OracleError::Malformed("missing top_logprobs".to_string()))?;

    Ok(top_logprobs
        .into_iter()
        .next()
        .map(Distribution::from_pairs)
        .unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: reqwest::Client,
    config: OracleConfig,
}

impl HttpOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        if !config.is_configured() {
            return Err(OracleError::NotConfigured);
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }
}

impl Oracle for HttpOracle {
    async fn predict(&self, prefix: &str) -> Result<Distribution, OracleError> {
        let token = self
            .config
            .api_token
            .as_deref()
            .ok_or(OracleError::NotConfigured)?;

        debug!(
            prefix_len = prefix.len(),
            top_k = self.config.top_k,
            "querying oracle"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(token)
            .json(&CompletionRequest {
                model: &self.config.model,
                prompt: prefix,
                max_tokens: 1,
                logprobs: self.config.top_k,
            })
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "oracle returned an error status");
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        parse_completion(&body)
    }
}

/// The oracle selected by configuration: live HTTP or the canned mock
#[derive(Debug)]
pub enum OracleClient {
    Http(HttpOracle),
    Mock(MockOracle),
}

impl OracleClient {
    pub fn from_config(config: OracleConfig) -> Result<Self, OracleError> {
        if config.mock {
            debug!("using mock oracle");
            return Ok(OracleClient::Mock(MockOracle::new()));
        }
        Ok(OracleClient::Http(HttpOracle::new(config)?))
    }
}

impl Oracle for OracleClient {
    async fn predict(&self, prefix: &str) -> Result<Distribution, OracleError> {
        match self {
            OracleClient::Http(oracle) => oracle.predict(prefix).await,
            OracleClient::Mock(oracle) => oracle.predict(prefix).await,
        }
    }
}
