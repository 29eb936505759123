#![allow(dead_code)]

use hud_analysis::Analyzer;
use hud_core::{Distribution, EngineConfig, Pacing};
use hud_oracle::MockOracle;

pub const SAMPLE_CODE: &str = "def f(x):\n    return x";

pub fn sample_config() -> EngineConfig {
    EngineConfig {
        pacing: Pacing::unthrottled(),
        ..EngineConfig::new()
    }
}

pub fn analyzer(oracle: MockOracle) -> Analyzer<MockOracle> {
    Analyzer::new(oracle, sample_config())
}

/// Mock that expects `x` right after an open paren
pub fn scripted_oracle() -> MockOracle {
    MockOracle::with_distribution(Distribution::from_pairs([
        ("\n", -0.2),
        (" +", -2.0),
        (")", -3.5),
    ]))
    .when_prefix_ends_with(
        "(",
        Distribution::from_pairs([("x", -0.1), (")", -2.5), ("self", -3.0)]),
    )
}
