pub mod analyze;
pub mod autopanic;
pub mod entropy;
pub mod ghost;
pub mod inspect;
pub mod precompute;
pub mod precompute_demo;
pub mod saliency;
pub mod version;

use crate::cli::{PrefixArgs, SourceArgs};
use anyhow::Context as _;
use hud_analysis::Analyzer;
use hud_core::prefix::prefix_at;
use hud_core::{EngineConfig, Pacing};
use hud_oracle::{OracleClient, OracleConfig};
use std::future::Future;
use std::io::Read;
use std::path::Path;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub oracle: OracleConfig,
    pub engine: EngineConfig,
}

impl Context {
    /// Environment first, then the `--mock` flag and the optional config file.
    /// A mock oracle answers instantly, so it runs unthrottled unless a config
    /// file sets the pacing explicitly.
    pub fn load(mock: bool, config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut oracle = OracleConfig::from_env();
        oracle.mock |= mock;

        let engine = match config_path {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None if oracle.mock => EngineConfig {
                pacing: Pacing::unthrottled(),
                ..EngineConfig::new()
            },
            None => EngineConfig::new(),
        };

        Ok(Self { oracle, engine })
    }

    pub fn analyzer(&self) -> anyhow::Result<Analyzer<OracleClient>> {
        let client = OracleClient::from_config(self.oracle.clone())
            .context("set CEREBRAS_API_TOKEN or pass --mock")?;
        Ok(Analyzer::new(client, self.engine.clone()))
    }
}

/// Run one async command to completion on a single-threaded runtime
pub fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

pub fn read_source(source: &SourceArgs) -> anyhow::Result<String> {
    match &source.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("failed to read stdin")?;
            Ok(code)
        }
    }
}

pub fn resolve_prefix(args: &PrefixArgs) -> anyhow::Result<String> {
    if let Some(prefix) = &args.prefix {
        return Ok(prefix.clone());
    }
    let code = read_source(&args.source)?;
    Ok(match (args.line, args.character) {
        (Some(line), Some(character)) => prefix_at(&code, line, character),
        _ => code,
    })
}

/// URI echoed back in results when none is given
pub fn source_uri(source: &SourceArgs, uri: Option<String>) -> String {
    uri.unwrap_or_else(|| match &source.file {
        Some(path) => format!("file://{}", path.display()),
        None => "untitled:stdin".to_string(),
    })
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mock_context_is_unthrottled() {
        let ctx = Context::load(true, None).unwrap();
        assert!(ctx.oracle.mock);
        assert_eq!(ctx.engine.pacing.prediction_ms, 0);
        assert!(ctx.analyzer().is_ok());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("engine.json");
        std::fs::write(&path, r#"{"margin_threshold": 0.3}"#).unwrap();

        let ctx = Context::load(true, Some(&path)).unwrap();
        assert_eq!(ctx.engine.margin_threshold, 0.3);
        assert_eq!(ctx.engine.pacing.prediction_ms, 500);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        assert!(Context::load(true, Some(Path::new("/nonexistent/engine.json"))).is_err());
    }

    #[test]
    fn test_resolve_prefix_from_file_and_cursor() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("a.py");
        std::fs::write(&path, "def f(x):\n    return x").unwrap();

        let args = PrefixArgs {
            prefix: None,
            source: SourceArgs {
                file: Some(path.clone()),
            },
            line: Some(2),
            character: Some(4),
        };
        assert_eq!(resolve_prefix(&args).unwrap(), "def f(x):\n    ");

        let whole = PrefixArgs {
            line: None,
            character: None,
            ..args
        };
        assert_eq!(resolve_prefix(&whole).unwrap(), "def f(x):\n    return x");
    }

    #[test]
    fn test_source_uri() {
        let source = SourceArgs {
            file: Some(PathBuf::from("/tmp/a.py")),
        };
        assert_eq!(source_uri(&source, None), "file:///tmp/a.py");
        assert_eq!(
            source_uri(&source, Some("untitled:1".to_string())),
            "untitled:1"
        );
        assert_eq!(source_uri(&SourceArgs { file: None }, None), "untitled:stdin");
    }
}
