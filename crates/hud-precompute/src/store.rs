//! Precomputed artifacts consumed by the replay layer
//!
//! Field names and the `"line:char"` key format are read by the HUD replay
//! code and must not change.

use crate::io::{read_json, write_json};
use chrono::{DateTime, Utc};
use hud_core::{CursorKey, EntropyResult, GhostResult, SaliencyBatch, TokenRank};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Every result computed for one code snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecomputedStore {
    pub code: String,
    pub token_ranks: Vec<TokenRank>,
    pub ghosts: BTreeMap<CursorKey, GhostResult>,
    pub entropies: BTreeMap<CursorKey, EntropyResult>,
    #[serde(default)]
    pub saliencies: BTreeMap<CursorKey, SaliencyBatch>,
}

/// Keys and sizes of a store, ignoring the floating-point values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreShape {
    pub token_ranks: usize,
    pub ghosts: BTreeSet<CursorKey>,
    pub entropies: BTreeSet<CursorKey>,
    pub saliencies: BTreeMap<CursorKey, usize>,
}

impl PrecomputedStore {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            token_ranks: Vec::new(),
            ghosts: BTreeMap::new(),
            entropies: BTreeMap::new(),
            saliencies: BTreeMap::new(),
        }
    }

    pub fn ghost_at(&self, line: usize, character: usize) -> Option<&GhostResult> {
        self.ghosts.get(&CursorKey::new(line, character))
    }

    pub fn entropy_at(&self, line: usize, character: usize) -> Option<&EntropyResult> {
        self.entropies.get(&CursorKey::new(line, character))
    }

    pub fn saliency_at(&self, line: usize, character: usize) -> Option<&SaliencyBatch> {
        self.saliencies.get(&CursorKey::new(line, character))
    }

    pub fn shape(&self) -> StoreShape {
        StoreShape {
            token_ranks: self.token_ranks.len(),
            ghosts: self.ghosts.keys().copied().collect(),
            entropies: self.entropies.keys().copied().collect(),
            saliencies: self
                .saliencies
                .iter()
                .map(|(k, batch)| (*k, batch.tokens.len()))
                .collect(),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        write_json(path, self)
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        read_json(path)
    }
}

/// Entropy and ghost fields for one demo cursor position, side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoPosition {
    #[serde(flatten)]
    pub entropy: EntropyResult,
    #[serde(flatten)]
    pub ghost: GhostResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoState {
    pub code: String,
    pub positions: BTreeMap<CursorKey, DemoPosition>,
}

/// Index of a demo code state, serialized as `"state_<index>"`.
///
/// Orders numerically so `state_2` sorts before `state_10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateKey(pub usize);

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state_{}", self.0)
    }
}

impl FromStr for StateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("state_")
            .and_then(|i| i.parse().ok())
            .map(StateKey)
            .ok_or_else(|| format!("invalid state key {s:?}, expected \"state_<index>\""))
    }
}

impl Serialize for StateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoStates {
    pub version: String,
    pub description: String,
    pub generated_at: DateTime<Utc>,
    /// Code states in typing order
    pub states: BTreeMap<StateKey, DemoState>,
}

/// Everything the scripted demo replays without touching the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoArtifact {
    pub demo_states: DemoStates,
    pub full_code: PrecomputedStore,
}

impl DemoArtifact {
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        write_json(path, self)
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        read_json(path)
    }
}
