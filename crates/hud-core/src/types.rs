//! Core types for confidence analysis results

use serde::{Deserialize, Serialize};

/// A lexical unit and its byte range in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// One (token, log-probability) row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenProb {
    pub token: String,
    pub logprob: f64,
}

impl TokenProb {
    pub fn new(token: impl Into<String>, logprob: f64) -> Self {
        Self {
            token: token.into(),
            logprob,
        }
    }
}

/// Top-K next-token distribution returned by one oracle call.
///
/// Entries keep the order the oracle sent them in, which carries no meaning.
/// Anything rank-dependent goes through [`Distribution::sorted`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    entries: Vec<TokenProb>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (token, logprob) pairs. A repeated token keeps its last value.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut dist = Self::new();
        for (token, logprob) in pairs {
            dist.insert(token, logprob);
        }
        dist
    }

    pub fn insert(&mut self, token: impl Into<String>, logprob: f64) {
        let token = token.into();
        match self.entries.iter_mut().find(|e| e.token == token) {
            Some(existing) => existing.logprob = logprob,
            None => self.entries.push(TokenProb { token, logprob }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenProb> {
        self.entries.iter()
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.token == token)
            .map(|e| e.logprob)
    }

    pub fn max_logprob(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.logprob)
            .fold(None, |acc, lp| match acc {
                Some(m) if m >= lp => Some(m),
                _ => Some(lp),
            })
    }

    /// Entries sorted descending by log-probability (stable for ties)
    pub fn sorted(&self) -> Vec<TokenProb> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            b.logprob
                .partial_cmp(&a.logprob)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    /// Probabilities renormalized over the retained entries.
    ///
    /// Uses the shifted exponential (subtract the max log-probability first) so
    /// very negative log-probabilities do not underflow to an all-zero vector.
    /// Returns an empty vector when there is no finite mass.
    pub fn probabilities(&self) -> Vec<(&str, f64)> {
        let Some(max) = self.max_logprob().filter(|m| m.is_finite()) else {
            return Vec::new();
        };
        let exps: Vec<(&str, f64)> = self
            .entries
            .iter()
            .map(|e| (e.token.as_str(), (e.logprob - max).exp()))
            .collect();
        let total: f64 = exps.iter().map(|(_, p)| p).sum();
        if total <= 0.0 || !total.is_finite() {
            return Vec::new();
        }
        exps.into_iter().map(|(t, p)| (t, p / total)).collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Token annotations for one source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineProbs {
    pub line_number: usize,
    pub tokens: Vec<TokenProb>,
}

/// Per-token confidence overlay for a whole file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileProbs {
    pub uri: String,
    pub lines: Vec<LineProbs>,
}

/// Rank of an observed token within the prediction made just before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRank {
    pub token: String,
    /// Byte offset of the token in the source
    pub position: usize,
    pub logprob: f64,
    /// 1-based rank, `-1` when the token is not in the top-K
    pub rank: i32,
    pub is_in_top5: bool,
}

impl TokenRank {
    /// Rank 1 at the confident default log-probability, used when the oracle
    /// was not asked or could not answer
    pub fn assumed_confident(token: &TokenSpan) -> Self {
        Self {
            token: token.text.clone(),
            position: token.start,
            logprob: crate::CONFIDENT_LOGPROB,
            rank: 1,
            is_in_top5: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostResult {
    pub primary: TokenProb,
    pub secondary: TokenProb,
    pub margin: f64,
    pub should_show_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropyResult {
    pub entropy: f64,
    pub max_logprob: f64,
    pub top_logprobs: Vec<TokenProb>,
    pub token_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutopanicResult {
    pub expecting_close: bool,
    pub close_types: Vec<String>,
    /// Renormalized probability mass of closing tokens
    pub confidence: f64,
    pub top_close_token: Option<String>,
    pub top_close_prob: f64,
}

/// Effect of deleting one earlier token on the next-token belief
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaliencyResult {
    pub line: usize,
    pub character: usize,
    pub token_text: String,
    pub kl_divergence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaliencyBatch {
    pub tokens: Vec<SaliencyResult>,
    pub base_entropy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_descending() {
        let dist = Distribution::from_pairs([("a", -3.0), ("b", -0.5), ("c", -1.0)]);
        let sorted: Vec<_> = dist.sorted().into_iter().map(|t| t.token).collect();
        assert_eq!(sorted, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_insert_replaces_duplicate() {
        let mut dist = Distribution::new();
        dist.insert("x", -1.0);
        dist.insert("x", -2.0);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist.get("x"), Some(-2.0));
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let dist = Distribution::from_pairs([("a", -800.0), ("b", -801.0), ("c", -805.0)]);
        let total: f64 = dist.probabilities().iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_probabilities_empty() {
        assert!(Distribution::new().probabilities().is_empty());
    }

    #[test]
    fn test_result_field_names() {
        let ghost = GhostResult {
            primary: TokenProb::new("(", -0.2),
            secondary: TokenProb::new(":", -1.9),
            margin: 0.7,
            should_show_ghost: false,
        };
        let json = serde_json::to_value(&ghost).unwrap();
        assert!(json.get("shouldShowGhost").is_some());

        let rank = TokenRank {
            token: "def".to_string(),
            position: 0,
            logprob: -0.1,
            rank: 1,
            is_in_top5: true,
        };
        let json = serde_json::to_value(&rank).unwrap();
        assert_eq!(json["isInTop5"], serde_json::Value::Bool(true));
    }
}
