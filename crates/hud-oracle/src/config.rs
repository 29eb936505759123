//! Oracle connection settings

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.cerebras.ai/v1/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b";

/// Token value shipped in sample env files; never a real credential
const PLACEHOLDER_TOKEN: &str = "YOUR_CEREBRAS_API_TOKEN";

#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Completions endpoint
    pub api_url: String,

    /// Bearer token
    pub api_token: Option<String>,

    pub model: String,

    /// Number of log-probabilities requested for the next position
    pub top_k: usize,

    pub timeout: Duration,

    /// Answer from a canned distribution instead of the network
    pub mock: bool,
}

impl OracleConfig {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            model: DEFAULT_MODEL.to_string(),
            top_k: 20,
            timeout: Duration::from_secs(30),
            mock: false,
        }
    }

    /// Read `CEREBRAS_API_URL`, `CEREBRAS_API_TOKEN`, `CEREBRAS_MODEL` and
    /// `HUD_MOCK_ORACLE`, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Some(url) = non_empty_var("CEREBRAS_API_URL") {
            config.api_url = url;
        }
        config.api_token = non_empty_var("CEREBRAS_API_TOKEN");
        if let Some(model) = non_empty_var("CEREBRAS_MODEL") {
            config.model = model;
        }
        config.mock = non_empty_var("HUD_MOCK_ORACLE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        config
    }

    /// A usable token is present
    pub fn is_configured(&self) -> bool {
        self.api_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty() && t != PLACEHOLDER_TOKEN)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "CEREBRAS_API_URL",
            "CEREBRAS_API_TOKEN",
            "CEREBRAS_MODEL",
            "HUD_MOCK_ORACLE",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = OracleConfig::new();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.top_k, 20);
        assert!(!config.mock);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_placeholder_token_is_not_configured() {
        let mut config = OracleConfig::new();
        config.api_token = Some(PLACEHOLDER_TOKEN.to_string());
        assert!(!config.is_configured());
        config.api_token = Some("csk-123".to_string());
        assert!(config.is_configured());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var("CEREBRAS_API_TOKEN", "csk-abc");
        std::env::set_var("CEREBRAS_MODEL", "llama-3.1-8b");
        std::env::set_var("HUD_MOCK_ORACLE", "TRUE");

        let config = OracleConfig::from_env();
        assert_eq!(config.api_token.as_deref(), Some("csk-abc"));
        assert_eq!(config.model, "llama-3.1-8b");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.mock);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_empty_values_ignored() {
        clear_env();
        std::env::set_var("CEREBRAS_API_TOKEN", "  ");
        let config = OracleConfig::from_env();
        assert_eq!(config.api_token, None);
        assert!(!config.mock);
        clear_env();
    }
}
