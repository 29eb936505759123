//! Cursor keys and prefix construction
//!
//! Lines are split on `\n` only and are 1-indexed. Characters are counted in
//! Unicode scalar values within a line and are 0-indexed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A prefix boundary, serialized as `"line:char"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorKey {
    pub line: usize,
    pub character: usize,
}

impl CursorKey {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for CursorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCursorKeyError(String);

impl fmt::Display for ParseCursorKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cursor key {:?}, expected \"line:char\"", self.0)
    }
}

impl std::error::Error for ParseCursorKeyError {}

impl FromStr for CursorKey {
    type Err = ParseCursorKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCursorKeyError(s.to_string());
        let (line, character) = s.split_once(':').ok_or_else(err)?;
        Ok(Self {
            line: line.parse().map_err(|_| err())?,
            character: character.parse().map_err(|_| err())?,
        })
    }
}

impl Serialize for CursorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CursorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn char_prefix(line: &str, chars: usize) -> &str {
    match line.char_indices().nth(chars) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

/// Source text from the start of the document through `line:character`.
///
/// Line 0 yields an empty prefix, a line past the end yields the whole code and
/// a character past the end of its line stops at the line end.
pub fn prefix_at(code: &str, line: usize, character: usize) -> String {
    if line < 1 {
        return String::new();
    }
    let lines: Vec<&str> = code.split('\n').collect();
    if line > lines.len() {
        return code.to_string();
    }
    let mut parts: Vec<&str> = lines[..line - 1].to_vec();
    parts.push(char_prefix(lines[line - 1], character));
    parts.join("\n")
}

/// The code with `len` characters removed from `line` starting at `character`
pub fn delete_chars(code: &str, line: usize, character: usize, len: usize) -> String {
    code.split('\n')
        .enumerate()
        .map(|(idx, text)| {
            if idx + 1 == line {
                text.chars()
                    .enumerate()
                    .filter(|(i, _)| *i < character || *i >= character + len)
                    .map(|(_, c)| c)
                    .collect()
            } else {
                text.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every cursor position of the code, line by line, from column 0 through the line end
pub fn cursor_positions(code: &str) -> impl Iterator<Item = CursorKey> + '_ {
    code.split('\n').enumerate().flat_map(|(idx, text)| {
        (0..=text.chars().count()).map(move |c| CursorKey::new(idx + 1, c))
    })
}

/// 1-indexed line containing a byte offset
pub fn line_of_offset(code: &str, offset: usize) -> usize {
    let end = offset.min(code.len());
    code.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

pub fn line_count(code: &str) -> usize {
    code.split('\n').count()
}
