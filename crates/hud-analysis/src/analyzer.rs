//! The five analysis operations, built on one oracle and one metric engine

use crate::budget::CallBudget;
use hud_core::metrics::{
    autopanic_report, entropy, entropy_report, ghost_report, kl_divergence, token_rank,
};
use hud_core::prefix::{delete_chars, line_count, line_of_offset, prefix_at};
use hud_core::selector::saliency_candidates;
use hud_core::{
    tokenize, AutopanicResult, Distribution, EngineConfig, EntropyResult, FileProbs,
    GhostResult, LineProbs, SaliencyBatch, SaliencyResult, TokenProb, TokenRank,
    TokenSampling,
};
use hud_oracle::{Oracle, OracleError, RateLimiter, Recovery};
use std::time::Duration;
use tracing::{debug, warn};

/// Rate-limited analysis over an oracle.
///
/// Single-shot operations (`compute_*`) surface oracle failures except for
/// empty or malformed answers, which read as "no data". The token overlay and
/// the batch helpers degrade per token instead and only stop on fatal errors.
#[derive(Debug)]
pub struct Analyzer<O> {
    oracle: O,
    config: EngineConfig,
    limiter: RateLimiter,
}

impl<O: Oracle> Analyzer<O> {
    pub fn new(oracle: O, config: EngineConfig) -> Self {
        Self {
            oracle,
            config,
            limiter: RateLimiter::new(),
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// One paced oracle call. Blank prefixes are never sent and come back empty.
    pub async fn predict(&self, prefix: &str, pace: Duration) -> Result<Distribution, OracleError> {
        if prefix.trim().is_empty() {
            return Ok(Distribution::new());
        }
        self.limiter.acquire(pace).await;
        self.oracle.predict(prefix).await
    }

    /// Like [`Analyzer::predict`] but reads malformed answers as an empty distribution
    async fn predict_or_empty(
        &self,
        prefix: &str,
        pace: Duration,
    ) -> Result<Distribution, OracleError> {
        match self.predict(prefix, pace).await {
            Err(err) if err.recovery() == Recovery::NoData => {
                warn!(error = %err, "oracle answer carried no distribution");
                Ok(Distribution::new())
            }
            other => other,
        }
    }

    /// Rank each sampled token within the prediction made at its start.
    ///
    /// The first token (blank prefix) is assumed confident without a query.
    /// Failed queries fall back to the confident default; only a fatal oracle
    /// error aborts. Tokens past the budget are left out.
    pub async fn rank_tokens(
        &self,
        code: &str,
        sampling: TokenSampling,
        pace: Duration,
        mut budget: CallBudget,
    ) -> Result<Vec<TokenRank>, OracleError> {
        let selected = sampling.select(tokenize(code));
        let total = selected.len();
        let mut ranks = Vec::with_capacity(total);

        for (i, token) in selected.into_iter().enumerate() {
            let prefix = &code[..token.start];
            if prefix.trim().is_empty() {
                ranks.push(TokenRank::assumed_confident(&token));
                continue;
            }
            if !budget.take() {
                debug!(skipped = total - i, "oracle call budget exhausted");
                break;
            }

            debug!(index = i + 1, total, token = %token.text, "ranking token");
            match self.predict(prefix, pace).await {
                Ok(dist) => ranks.push(token_rank(&dist, &token)),
                Err(err) => match err.recovery() {
                    Recovery::Fatal => return Err(err),
                    Recovery::AssumeConfident | Recovery::NoData => {
                        warn!(position = token.start, error = %err, "assuming confident token");
                        ranks.push(TokenRank::assumed_confident(&token));
                    }
                },
            }
        }

        Ok(ranks)
    }

    /// Per-token confidence overlay, one entry per source line
    pub async fn analyze_tokens(&self, code: &str, uri: &str) -> Result<FileProbs, OracleError> {
        debug!(uri, "analyzing tokens");
        let ranks = self
            .rank_tokens(
                code,
                self.config.overlay_sampling,
                self.config.pacing.prediction(),
                CallBudget::limited(self.config.max_calls_per_request),
            )
            .await?;

        let mut lines: Vec<LineProbs> = (1..=line_count(code))
            .map(|line_number| LineProbs {
                line_number,
                tokens: Vec::new(),
            })
            .collect();
        for rank in ranks {
            let idx = line_of_offset(code, rank.position) - 1;
            lines[idx].tokens.push(TokenProb::new(rank.token, rank.logprob));
        }

        Ok(FileProbs {
            uri: uri.to_string(),
            lines,
        })
    }

    pub async fn compute_entropy(&self, prefix: &str) -> Result<EntropyResult, OracleError> {
        let dist = self
            .predict_or_empty(prefix, self.config.pacing.prediction())
            .await?;
        Ok(entropy_report(&dist, self.config.top_logprobs_shown))
    }

    /// Ghost suggestion, `None` when the oracle offered fewer than two tokens
    pub async fn compute_ghost(&self, prefix: &str) -> Result<Option<GhostResult>, OracleError> {
        let dist = self
            .predict_or_empty(prefix, self.config.pacing.prediction())
            .await?;
        Ok(ghost_report(&dist, self.config.margin_threshold))
    }

    pub async fn compute_autopanic(&self, prefix: &str) -> Result<AutopanicResult, OracleError> {
        let dist = self
            .predict_or_empty(prefix, self.config.pacing.prediction())
            .await?;
        Ok(autopanic_report(&dist, self.config.close_mass_threshold))
    }

    /// Saliency of the identifiers around a cursor, bounded per request
    pub async fn compute_saliency(
        &self,
        code: &str,
        uri: &str,
        cursor_line: usize,
        cursor_char: usize,
    ) -> Result<SaliencyBatch, OracleError> {
        debug!(uri, cursor_line, cursor_char, "computing saliency");
        self.saliency(
            code,
            cursor_line,
            cursor_char,
            CallBudget::limited(self.config.max_calls_per_request),
        )
        .await
    }

    /// Delete each candidate identifier in turn and measure how far the
    /// next-token distribution at the cursor moves.
    ///
    /// A failed baseline is an error; failed perturbation queries are skipped.
    pub async fn saliency(
        &self,
        code: &str,
        cursor_line: usize,
        cursor_char: usize,
        mut budget: CallBudget,
    ) -> Result<SaliencyBatch, OracleError> {
        let pacing = &self.config.pacing;
        let prefix = prefix_at(code, cursor_line, cursor_char);

        if !prefix.trim().is_empty() && !budget.take() {
            return Ok(empty_batch());
        }
        let baseline = self.predict_or_empty(&prefix, pacing.prediction()).await?;
        if baseline.is_empty() {
            return Ok(empty_batch());
        }

        let mut results = Vec::new();
        for candidate in saliency_candidates(code, cursor_line, cursor_char, &self.config) {
            let len = candidate.token_text.chars().count();
            let perturbed_code = delete_chars(code, candidate.line, candidate.character, len);
            let perturbed_prefix = prefix_at(&perturbed_code, cursor_line, cursor_char);
            if perturbed_prefix == prefix {
                // Token sits after the cursor; deleting it cannot change the prediction
                continue;
            }
            if !perturbed_prefix.trim().is_empty() && !budget.take() {
                debug!("saliency call budget exhausted");
                break;
            }

            let perturbed = match self.predict(&perturbed_prefix, pacing.saliency()).await {
                Ok(dist) if !dist.is_empty() => dist,
                Ok(_) => continue,
                Err(err) if err.recovery() == Recovery::Fatal => return Err(err),
                Err(err) => {
                    warn!(
                        line = candidate.line,
                        character = candidate.character,
                        error = %err,
                        "skipping saliency candidate"
                    );
                    continue;
                }
            };

            let kl = kl_divergence(&baseline, &perturbed, self.config.kl_floor);
            if kl > self.config.saliency_threshold {
                results.push(SaliencyResult {
                    line: candidate.line,
                    character: candidate.character,
                    token_text: candidate.token_text,
                    kl_divergence: kl,
                });
            }
        }

        results.sort_by(|a, b| {
            b.kl_divergence
                .partial_cmp(&a.kl_divergence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(self.config.max_saliency_results);

        Ok(SaliencyBatch {
            tokens: results,
            base_entropy: entropy(&baseline),
        })
    }
}

fn empty_batch() -> SaliencyBatch {
    SaliencyBatch {
        tokens: Vec::new(),
        base_entropy: 0.0,
    }
}
