//! Candidate selection under an oracle call budget

use crate::config::EngineConfig;
use crate::types::TokenSpan;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static IDENTIFIER_RE: OnceLock<Regex> = OnceLock::new();

/// Which tokens of a file get their own oracle query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSampling {
    /// Every token
    Full,
    /// All tokens when there are at most `head + tail`, otherwise only the
    /// first `head` and last `tail`. The middle of larger files is left
    /// unanalyzed.
    HeadTail { head: usize, tail: usize },
}

impl TokenSampling {
    pub fn select<I>(&self, tokens: I) -> Vec<TokenSpan>
    where
        I: IntoIterator<Item = TokenSpan>,
    {
        let all: Vec<TokenSpan> = tokens.into_iter().collect();
        match *self {
            TokenSampling::Full => all,
            TokenSampling::HeadTail { head, tail } => {
                if all.len() <= head + tail {
                    return all;
                }
                let tail_start = all.len() - tail;
                all.into_iter()
                    .enumerate()
                    .filter(|(i, _)| *i < head || *i >= tail_start)
                    .map(|(_, t)| t)
                    .collect()
            }
        }
    }
}

impl Default for TokenSampling {
    fn default() -> Self {
        TokenSampling::HeadTail { head: 5, tail: 5 }
    }
}

/// An identifier whose deletion is tested for saliency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaliencyCandidate {
    /// 1-indexed line
    pub line: usize,
    /// 0-indexed character within the line
    pub character: usize,
    pub token_text: String,
}

impl SaliencyCandidate {
    fn distance_to(&self, cursor_line: usize, cursor_char: usize) -> (usize, usize) {
        let line_dist = self.line.abs_diff(cursor_line);
        let char_dist = if line_dist == 0 {
            self.character.abs_diff(cursor_char)
        } else {
            0
        };
        (line_dist, char_dist)
    }
}

/// Identifiers near the cursor, nearest first, capped at `max_saliency_candidates`
pub fn saliency_candidates(
    code: &str,
    cursor_line: usize,
    cursor_char: usize,
    config: &EngineConfig,
) -> Vec<SaliencyCandidate> {
    let re = IDENTIFIER_RE.get_or_init(|| Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]*\b").unwrap());

    let first_line = cursor_line.saturating_sub(config.saliency_lines_before).max(1);
    let last_line = cursor_line + config.saliency_lines_after;

    let mut candidates = Vec::new();
    for (idx, text) in code.split('\n').enumerate() {
        let line = idx + 1;
        if line < first_line || line > last_line {
            continue;
        }
        for m in re.find_iter(text) {
            if m.as_str().chars().count() < config.min_identifier_len {
                continue;
            }
            candidates.push(SaliencyCandidate {
                line,
                character: text[..m.start()].chars().count(),
                token_text: m.as_str().to_string(),
            });
        }
    }

    candidates.sort_by_key(|c| c.distance_to(cursor_line, cursor_char));
    candidates.truncate(config.max_saliency_candidates);
    candidates
}
