use super::print_json;
use anyhow::Context as _;
use hud_precompute::{DemoArtifact, PrecomputedStore, StateKey};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize)]
struct StoreSummary {
    lines: usize,
    token_ranks: usize,
    /// Tokens outside the oracle's top-5 at their position
    surprising_tokens: usize,
    ghosts: usize,
    ghosts_shown: usize,
    entropies: usize,
    saliencies: usize,
    salient_tokens: usize,
}

impl StoreSummary {
    fn of(store: &PrecomputedStore) -> Self {
        Self {
            lines: store.code.split('\n').count(),
            token_ranks: store.token_ranks.len(),
            surprising_tokens: store.token_ranks.iter().filter(|r| !r.is_in_top5).count(),
            ghosts: store.ghosts.len(),
            ghosts_shown: store
                .ghosts
                .values()
                .filter(|g| g.should_show_ghost)
                .count(),
            entropies: store.entropies.len(),
            saliencies: store.saliencies.len(),
            salient_tokens: store.saliencies.values().map(|b| b.tokens.len()).sum(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DemoSummary {
    version: String,
    generated_at: String,
    /// Recorded positions per code state
    states: BTreeMap<StateKey, usize>,
    full_code: StoreSummary,
}

pub fn run(path: &Path, demo: bool) -> anyhow::Result<()> {
    if demo {
        let artifact = DemoArtifact::load(path)
            .with_context(|| format!("failed to load demo artifact {}", path.display()))?;
        print_json(&summarize_demo(&artifact))
    } else {
        let store = PrecomputedStore::load(path)
            .with_context(|| format!("failed to load artifact {}", path.display()))?;
        print_json(&StoreSummary::of(&store))
    }
}

fn summarize_demo(artifact: &DemoArtifact) -> DemoSummary {
    DemoSummary {
        version: artifact.demo_states.version.clone(),
        generated_at: artifact.demo_states.generated_at.to_rfc3339(),
        states: artifact
            .demo_states
            .states
            .iter()
            .map(|(key, state)| (*key, state.positions.len()))
            .collect(),
        full_code: StoreSummary::of(&artifact.full_code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hud_core::{CursorKey, EntropyResult, GhostResult, TokenProb, TokenRank};

    fn sample_store() -> PrecomputedStore {
        let mut store = PrecomputedStore::new("x = 1\ny");
        store.token_ranks = vec![
            TokenRank {
                token: "x".to_string(),
                position: 0,
                logprob: -0.1,
                rank: 1,
                is_in_top5: true,
            },
            TokenRank {
                token: "=".to_string(),
                position: 2,
                logprob: -5.0,
                rank: -1,
                is_in_top5: false,
            },
        ];
        store.ghosts.insert(
            CursorKey::new(1, 1),
            GhostResult {
                primary: TokenProb::new(" =", -0.4),
                secondary: TokenProb::new(",", -0.6),
                margin: 0.08,
                should_show_ghost: true,
            },
        );
        store.entropies.insert(
            CursorKey::new(1, 1),
            EntropyResult {
                entropy: 1.2,
                max_logprob: -0.4,
                top_logprobs: vec![TokenProb::new(" =", -0.4)],
                token_count: 2,
            },
        );
        store
    }

    #[test]
    fn test_store_summary() {
        let summary = StoreSummary::of(&sample_store());
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.token_ranks, 2);
        assert_eq!(summary.surprising_tokens, 1);
        assert_eq!(summary.ghosts_shown, 1);
        assert_eq!(summary.entropies, 1);
        assert_eq!(summary.salient_tokens, 0);
    }

    #[test]
    fn test_inspect_saved_store() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("precomputed.json");
        sample_store().save(&path).unwrap();

        assert!(run(&path, false).is_ok());
        assert!(run(&path, true).is_err());
    }
}
