//! Metric engine: pure functions over top-K distributions
//!
//! All probabilities are renormalized over the K entries the oracle returned.
//! Entropy in particular is the entropy of that truncated distribution, which
//! underestimates the true next-token entropy whenever mass sits outside the
//! top-K. The HUD only compares positions against each other, so that bias is
//! accepted.

use crate::types::{
    AutopanicResult, Distribution, EntropyResult, GhostResult, TokenProb, TokenRank, TokenSpan,
};
use crate::NOT_FOUND_LOGPROB;

/// Exact closing tokens, compared after trimming
const CLOSING_TOKENS: &[&str] = &[
    "}", ")", "]", "end", "fi", "done", ";", "pass", "return", "break", "continue",
];

const CLOSING_BRACKETS: &[char] = &['}', ')', ']'];

/// `maxLogprob` reported for an empty distribution
const EMPTY_MAX_LOGPROB: f64 = -10.0;

/// 1-based rank of `actual` in the distribution, `None` when outside the top-K
pub fn surprise_rank(dist: &Distribution, actual: &str) -> Option<usize> {
    let actual = actual.trim();
    dist.sorted()
        .iter()
        .position(|e| e.token.trim() == actual)
        .map(|idx| idx + 1)
}

/// Rank record for an observed token given the prediction made just before it
pub fn token_rank(dist: &Distribution, token: &TokenSpan) -> TokenRank {
    let rank = surprise_rank(dist, &token.text);
    let logprob = match rank {
        Some(r) => dist.sorted()[r - 1].logprob,
        None => NOT_FOUND_LOGPROB,
    };
    TokenRank {
        token: token.text.clone(),
        position: token.start,
        logprob,
        rank: rank.map_or(-1, |r| r as i32),
        is_in_top5: rank.is_some_and(|r| r <= 5),
    }
}

/// Color intensity for a rank: 0 is unsurprising, 1 is maximally surprising
pub fn surprise_level(rank: Option<usize>) -> f64 {
    match rank {
        Some(1) => 0.05,
        Some(2) => 0.25,
        Some(3) => 0.5,
        Some(4..=5) => 0.75,
        _ => 1.0,
    }
}

/// Shannon entropy in bits of the renormalized top-K distribution
pub fn entropy(dist: &Distribution) -> f64 {
    let h: f64 = dist
        .probabilities()
        .iter()
        .filter(|(_, p)| *p > 0.0)
        .map(|(_, p)| -p * p.log2())
        .sum();
    h.max(0.0)
}

/// Normalized gap between the two most likely entries, in [0, 1]
pub fn margin(dist: &Distribution) -> f64 {
    let sorted = dist.sorted();
    if sorted.len() < 2 {
        return 1.0;
    }
    // (p1 - p2) / (p1 + p2) == tanh((lp1 - lp2) / 2)
    let gap = sorted[0].logprob - sorted[1].logprob;
    if gap.is_nan() {
        return 0.0;
    }
    (gap / 2.0).tanh()
}

pub fn is_low_confidence(margin: f64, threshold: f64) -> bool {
    margin < threshold
}

fn is_bracket_close(token: &str) -> bool {
    token.trim_start().starts_with(CLOSING_BRACKETS)
}

fn is_closing(token: &str, has_bracket_close: bool) -> bool {
    if token == "\n\n" || is_bracket_close(token) {
        return true;
    }
    if token == "\n" {
        return has_bracket_close;
    }
    let trimmed = token.trim();
    !trimmed.is_empty() && CLOSING_TOKENS.contains(&trimmed)
}

/// How strongly the model expects a block or statement to close next
#[derive(Debug, Clone, PartialEq)]
pub struct ClosingExpectation {
    /// Renormalized mass of closing tokens
    pub mass: f64,
    /// Closing tokens, most likely first
    pub tokens: Vec<(String, f64)>,
}

impl ClosingExpectation {
    pub fn expecting_close(&self, threshold: f64) -> bool {
        self.mass > threshold
    }

    pub fn top(&self) -> Option<&(String, f64)> {
        self.tokens.first()
    }
}

pub fn closing_expectation(dist: &Distribution) -> ClosingExpectation {
    let has_bracket_close = dist.iter().any(|e| is_bracket_close(&e.token));

    let mut tokens: Vec<(String, f64)> = dist
        .probabilities()
        .into_iter()
        .filter(|(token, _)| is_closing(token, has_bracket_close))
        .map(|(token, p)| (token.to_string(), p))
        .collect();
    tokens.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ClosingExpectation {
        mass: tokens.iter().map(|(_, p)| p).sum(),
        tokens,
    }
}

/// `KL(baseline || perturbed)` in nats.
///
/// Tokens missing from the perturbed side get probability `floor`. The result
/// is clamped at zero, since the floor can push a near-identical pair a hair
/// below it.
pub fn kl_divergence(baseline: &Distribution, perturbed: &Distribution, floor: f64) -> f64 {
    let q = perturbed.probabilities();
    let kl: f64 = baseline
        .probabilities()
        .iter()
        .filter(|(_, p)| *p > 0.0)
        .map(|(token, p)| {
            let q = q
                .iter()
                .find(|(t, _)| t == token)
                .map(|(_, q)| *q)
                .filter(|q| *q > 0.0)
                .unwrap_or(floor);
            p * (p / q).ln()
        })
        .sum();
    kl.max(0.0)
}

pub fn entropy_report(dist: &Distribution, top_n: usize) -> EntropyResult {
    let sorted = dist.sorted();
    EntropyResult {
        entropy: entropy(dist),
        max_logprob: sorted.first().map_or(EMPTY_MAX_LOGPROB, |e| e.logprob),
        token_count: sorted.len(),
        top_logprobs: sorted.into_iter().take(top_n).collect(),
    }
}

/// Primary/secondary suggestion, `None` when fewer than two entries exist
pub fn ghost_report(dist: &Distribution, margin_threshold: f64) -> Option<GhostResult> {
    let mut sorted = dist.sorted().into_iter();
    let primary: TokenProb = sorted.next()?;
    let secondary: TokenProb = sorted.next()?;
    let margin = margin(dist);
    Some(GhostResult {
        primary,
        secondary,
        margin,
        should_show_ghost: is_low_confidence(margin, margin_threshold),
    })
}

pub fn autopanic_report(dist: &Distribution, close_threshold: f64) -> AutopanicResult {
    let closing = closing_expectation(dist);
    let (top_close_token, top_close_prob) = match closing.top() {
        Some((token, p)) => (Some(token.clone()), *p),
        None => (None, 0.0),
    };
    AutopanicResult {
        expecting_close: closing.expecting_close(close_threshold),
        close_types: closing.tokens.iter().take(3).map(|(t, _)| t.clone()).collect(),
        confidence: closing.mass,
        top_close_token,
        top_close_prob,
    }
}
