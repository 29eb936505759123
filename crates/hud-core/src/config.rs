//! Configuration for confidence analysis

use crate::selector::TokenSampling;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum spacing between oracle calls, per call site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Single-token predictions (token rank pass)
    pub prediction_ms: u64,
    /// Dense per-character sweeps (ghost/entropy at every cursor position)
    pub sweep_ms: u64,
    /// Perturbed-prefix queries inside one saliency computation
    pub saliency_ms: u64,
    /// Positions of the demo code states
    pub demo_ms: u64,
}

impl Pacing {
    pub fn new() -> Self {
        Self {
            prediction_ms: 500,
            sweep_ms: 200,
            saliency_ms: 100,
            demo_ms: 300,
        }
    }

    /// No spacing at all; for mock oracles and tests
    pub fn unthrottled() -> Self {
        Self {
            prediction_ms: 0,
            sweep_ms: 0,
            saliency_ms: 0,
            demo_ms: 0,
        }
    }

    pub fn prediction(&self) -> Duration {
        Duration::from_millis(self.prediction_ms)
    }

    pub fn sweep(&self) -> Duration {
        Duration::from_millis(self.sweep_ms)
    }

    pub fn saliency(&self) -> Duration {
        Duration::from_millis(self.saliency_ms)
    }

    pub fn demo(&self) -> Duration {
        Duration::from_millis(self.demo_ms)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new()
    }
}

/// Analysis engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ghost text is shown when the top-1/top-2 margin is below this
    pub margin_threshold: f64,

    /// Closing-token mass above this means "expecting close"
    pub close_mass_threshold: f64,

    /// KL divergence (nats) a deletion must exceed to be reported
    pub saliency_threshold: f64,

    /// Probability substituted for tokens missing from the perturbed side
    pub kl_floor: f64,

    /// Saliency candidates queried per cursor
    pub max_saliency_candidates: usize,

    /// Saliency results kept per cursor
    pub max_saliency_results: usize,

    /// Lines before the cursor line searched for saliency candidates
    pub saliency_lines_before: usize,

    /// Lines after the cursor line searched for saliency candidates
    pub saliency_lines_after: usize,

    /// Shortest identifier considered a saliency candidate
    pub min_identifier_len: usize,

    /// Entries listed in an entropy result
    pub top_logprobs_shown: usize,

    /// Token sampling for the live confidence overlay
    pub overlay_sampling: TokenSampling,

    /// Upper bound on oracle calls made for one live request
    pub max_calls_per_request: usize,

    /// Rate limits per call site
    pub pacing: Pacing,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            margin_threshold: 0.15,
            close_mass_threshold: 0.5,
            saliency_threshold: 0.001,
            kl_floor: 1e-10,
            max_saliency_candidates: 10,
            max_saliency_results: 10,
            saliency_lines_before: 5,
            saliency_lines_after: 2,
            min_identifier_len: 2,
            top_logprobs_shown: 10,
            overlay_sampling: TokenSampling::default(),
            max_calls_per_request: 16,
            pacing: Pacing::new(),
        }
    }

    /// Load overrides from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &std::path::Path) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.margin_threshold, 0.15);
        assert_eq!(config.close_mass_threshold, 0.5);
        assert_eq!(config.max_saliency_candidates, 10);
        assert_eq!(config.pacing.prediction(), Duration::from_millis(500));
        assert_eq!(config.pacing.sweep(), Duration::from_millis(200));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"margin_threshold": 0.3, "pacing": {"sweep_ms": 50}}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.margin_threshold, 0.3);
        assert_eq!(config.pacing.sweep_ms, 50);
        assert_eq!(config.pacing.prediction_ms, 500);
        assert_eq!(config.max_calls_per_request, 16);
    }

    #[test]
    fn test_sampling_from_json() {
        let json = r#"{"overlay_sampling": "full"}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.overlay_sampling, TokenSampling::Full);
    }
}
