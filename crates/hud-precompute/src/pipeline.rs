//! Precompute pipeline driving the analyzer over every cursor position

use crate::error::PrecomputeError;
use crate::store::{DemoArtifact, DemoPosition, DemoState, DemoStates, PrecomputedStore, StateKey};
use chrono::Utc;
use hud_analysis::{Analyzer, CallBudget};
use hud_core::metrics::{entropy_report, ghost_report};
use hud_core::prefix::{cursor_positions, prefix_at};
use hud_core::{CursorKey, TokenSampling};
use hud_oracle::{Oracle, OracleError, Recovery};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

const DEMO_VERSION: &str = "1.0";
const DEMO_DESCRIPTION: &str = "Precomputed data for the HUD demo";

/// Keep going past a failed position unless the failure is fatal
fn tolerate<T>(
    result: Result<T, OracleError>,
    key: CursorKey,
    phase: &str,
) -> Result<Option<T>, OracleError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.recovery() == Recovery::Fatal => Err(err),
        Err(err) => {
            warn!(position = %key, phase, error = %err, "skipping position");
            Ok(None)
        }
    }
}

/// Cursor positions worth replaying in a demo state: every line end plus the
/// middle of lines longer than five characters
fn demo_positions(code: &str) -> BTreeSet<CursorKey> {
    let mut positions = BTreeSet::new();
    for (idx, line) in code.split('\n').enumerate() {
        let len = line.chars().count();
        positions.insert(CursorKey::new(idx + 1, len));
        if len > 5 {
            positions.insert(CursorKey::new(idx + 1, len / 2));
        }
    }
    positions
}

/// Drives one analyzer across whole code snapshots and collects the results.
///
/// Runs are sequential and paced by the analyzer's rate limiter. Failed
/// positions are logged and left out of the artifact.
#[derive(Debug)]
pub struct Pipeline<O> {
    analyzer: Analyzer<O>,
}

impl<O: Oracle> Pipeline<O> {
    pub fn new(analyzer: Analyzer<O>) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &Analyzer<O> {
        &self.analyzer
    }

    /// Token ranks, ghost/entropy at every cursor position and saliency at
    /// every line end
    pub async fn precompute(&self, code: &str) -> Result<PrecomputedStore, PrecomputeError> {
        self.build_store(code, true).await
    }

    async fn build_store(
        &self,
        code: &str,
        with_saliency: bool,
    ) -> Result<PrecomputedStore, PrecomputeError> {
        let pacing = &self.analyzer.config().pacing;
        let mut store = PrecomputedStore::new(code);
        let line_total = code.split('\n').count();

        info!("computing token ranks");
        store.token_ranks = self
            .analyzer
            .rank_tokens(
                code,
                TokenSampling::Full,
                pacing.prediction(),
                CallBudget::unlimited(),
            )
            .await?;

        info!("computing ghost tokens and entropy");
        let mut current_line = 1;
        for key in cursor_positions(code) {
            if key.line != current_line {
                info!(line = current_line, total = line_total, "line done");
                current_line = key.line;
            }
            let prefix = prefix_at(code, key.line, key.character);
            if prefix.trim().is_empty() {
                continue;
            }
            let result = self.analyzer.predict(&prefix, pacing.sweep()).await;
            let Some(dist) = tolerate(result, key, "sweep")? else {
                continue;
            };
            if let Some(ghost) = ghost_report(&dist, self.analyzer.config().margin_threshold) {
                store.ghosts.insert(key, ghost);
            }
            store.entropies.insert(
                key,
                entropy_report(&dist, self.analyzer.config().top_logprobs_shown),
            );
        }

        if with_saliency {
            info!("computing saliency");
            for (idx, line) in code.split('\n').enumerate() {
                let key = CursorKey::new(idx + 1, line.chars().count());
                let result = self
                    .analyzer
                    .saliency(code, key.line, key.character, CallBudget::unlimited())
                    .await;
                if let Some(batch) = tolerate(result, key, "saliency")? {
                    store.saliencies.insert(key, batch);
                }
            }
        }

        info!(
            token_ranks = store.token_ranks.len(),
            ghosts = store.ghosts.len(),
            entropies = store.entropies.len(),
            saliencies = store.saliencies.len(),
            "precompute complete"
        );
        Ok(store)
    }

    /// Merged entropy/ghost results at the demo positions of each code state,
    /// plus a full store (without saliency) for the final state
    pub async fn precompute_demo<S: AsRef<str>>(
        &self,
        states: &[S],
    ) -> Result<DemoArtifact, PrecomputeError> {
        let final_code = states.last().ok_or(PrecomputeError::NoCodeStates)?.as_ref();
        let config = self.analyzer.config();
        let mut demo_states = BTreeMap::new();

        for (i, code) in states.iter().enumerate() {
            let code = code.as_ref();
            info!(state = i + 1, total = states.len(), "processing code state");
            let mut positions = BTreeMap::new();

            for key in demo_positions(code) {
                let prefix = prefix_at(code, key.line, key.character);
                if prefix.trim().is_empty() {
                    continue;
                }
                let result = self.analyzer.predict(&prefix, config.pacing.demo()).await;
                let Some(dist) = tolerate(result, key, "demo")? else {
                    continue;
                };
                match ghost_report(&dist, config.margin_threshold) {
                    Some(ghost) => {
                        positions.insert(
                            key,
                            DemoPosition {
                                entropy: entropy_report(&dist, config.top_logprobs_shown),
                                ghost,
                            },
                        );
                    }
                    None => warn!(position = %key, "fewer than two predictions, skipping"),
                }
            }

            demo_states.insert(
                StateKey(i),
                DemoState {
                    code: code.to_string(),
                    positions,
                },
            );
        }

        info!("precomputing full code at every cursor position");
        let full_code = self.build_store(final_code, false).await?;

        Ok(DemoArtifact {
            demo_states: DemoStates {
                version: DEMO_VERSION.to_string(),
                description: DEMO_DESCRIPTION.to_string(),
                generated_at: Utc::now(),
                states: demo_states,
            },
            full_code,
        })
    }
}
