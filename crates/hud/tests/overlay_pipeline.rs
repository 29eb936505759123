mod common;

use common::{analyzer, SAMPLE_CODE};
use hud_core::{CONFIDENT_LOGPROB, NOT_FOUND_LOGPROB};
use hud_oracle::{MockOracle, OracleError};

#[tokio::test]
async fn test_overlay_with_failing_oracle_falls_back_to_confident() {
    let analyzer = analyzer(MockOracle::failing(OracleError::Transport(
        "connection refused".into(),
    )));

    let probs = analyzer
        .analyze_tokens(SAMPLE_CODE, "file:///f.py")
        .await
        .unwrap();

    assert_eq!(probs.uri, "file:///f.py");
    assert_eq!(probs.lines.len(), 2);
    assert_eq!(probs.lines[0].line_number, 1);
    assert!(!probs.lines[0].tokens.is_empty());
    assert!(probs
        .lines
        .iter()
        .flat_map(|l| &l.tokens)
        .all(|t| t.logprob == CONFIDENT_LOGPROB));
}

#[tokio::test]
async fn test_overlay_with_unconfigured_oracle_fails() {
    let analyzer = analyzer(MockOracle::failing(OracleError::NotConfigured));
    let result = analyzer.analyze_tokens(SAMPLE_CODE, "file:///f.py").await;
    assert_eq!(result.unwrap_err(), OracleError::NotConfigured);
}

#[tokio::test]
async fn test_overlay_marks_unpredicted_tokens() {
    let analyzer = analyzer(common::scripted_oracle());
    let probs = analyzer
        .analyze_tokens("f(x)", "untitled:1")
        .await
        .unwrap();

    let tokens = &probs.lines[0].tokens;
    let texts: Vec<&str> = tokens.iter().map(|t| t.token.as_str()).collect();
    assert_eq!(texts, vec!["f", "(", "x", ")"]);
    // `f` has a blank prefix, `x` is the top prediction after `(`
    assert_eq!(tokens[0].logprob, CONFIDENT_LOGPROB);
    assert_eq!(tokens[2].logprob, -0.1);
    // `(` never shows up in the fallback distribution
    assert_eq!(tokens[1].logprob, NOT_FOUND_LOGPROB);
}

#[tokio::test]
async fn test_single_shot_metrics_share_one_distribution() {
    let analyzer = analyzer(common::scripted_oracle());

    let entropy = analyzer.compute_entropy("print(").await.unwrap();
    assert_eq!(entropy.token_count, 3);
    assert_eq!(entropy.max_logprob, -0.1);
    assert_eq!(entropy.top_logprobs[0].token, "x");

    let ghost = analyzer.compute_ghost("print(").await.unwrap().unwrap();
    assert_eq!(ghost.primary.token, "x");
    assert_eq!(ghost.secondary.token, ")");
    assert!(!ghost.should_show_ghost);

    let panic = analyzer.compute_autopanic("print(").await.unwrap();
    assert!(!panic.expecting_close);
    assert_eq!(panic.top_close_token.as_deref(), Some(")"));
    assert_eq!(analyzer.oracle().calls(), 3);
}
