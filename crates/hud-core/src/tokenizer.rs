//! Lexical tokenizer over source text
//!
//! A maximal run of word characters is one token, every other non-whitespace
//! character is a token on its own. This is a lexical approximation, so `->`
//! comes out as `-` and `>`.

use crate::types::TokenSpan;
use regex::Regex;
use std::sync::OnceLock;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"\w+|[^\w\s]").unwrap())
}

/// Lazy iterator over the tokens of a text. Cloning restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = TokenSpan;

    fn next(&mut self) -> Option<TokenSpan> {
        if self.pos >= self.text.len() {
            return None;
        }
        let m = token_re().find_at(self.text, self.pos)?;
        self.pos = m.end();
        Some(TokenSpan {
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        })
    }
}

pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(src: &str) -> Vec<String> {
        tokenize(src).map(|t| t.text).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("   \n\t").count(), 0);
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            texts("def f(x):\n    return x"),
            vec!["def", "f", "(", "x", ")", ":", "return", "x"]
        );
    }

    #[test]
    fn test_operators_split() {
        assert_eq!(texts("a->b"), vec!["a", "-", ">", "b"]);
    }

    #[test]
    fn test_offsets_reconstruct_source() {
        let src = "fn main() {\n    let x_1 = a->b; // ünïcode\n}";
        let mut rebuilt = String::new();
        let mut last = 0;
        for tok in tokenize(src) {
            assert!(!tok.text.is_empty());
            assert!(tok.start >= last, "overlap at {}", tok.start);
            let gap = &src[last..tok.start];
            assert!(gap.chars().all(char::is_whitespace));
            rebuilt.push_str(gap);
            rebuilt.push_str(&tok.text);
            assert_eq!(&src[tok.start..tok.end], tok.text);
            last = tok.end;
        }
        rebuilt.push_str(&src[last..]);
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn test_restartable() {
        let tokens = tokenize("x = 1");
        let first: Vec<_> = tokens.clone().collect();
        let second: Vec<_> = tokens.collect();
        assert_eq!(first, second);
    }
}
