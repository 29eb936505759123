use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hud")]
#[command(version)]
#[command(about = "Model-confidence overlay for source code")]
pub struct Cli {
    /// Answer from a canned distribution instead of calling the oracle
    #[arg(long, global = true)]
    pub mock: bool,

    /// Engine configuration (JSON, missing fields use defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the source text comes from; stdin when no file is given
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Source file to read
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// A prefix given literally, or cut from a source at a cursor
#[derive(Args, Debug, Clone)]
pub struct PrefixArgs {
    /// Prefix text, used as-is
    #[arg(long, conflicts_with_all = ["file", "line", "character"])]
    pub prefix: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Cursor line (1-based); the whole source is the prefix when omitted
    #[arg(long, requires = "character")]
    pub line: Option<usize>,

    /// Cursor character within the line (0-based)
    #[arg(long, requires = "line")]
    pub character: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-token confidence overlay for a file
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Document URI echoed in the result
        #[arg(long)]
        uri: Option<String>,
    },

    /// Next-token entropy at a cursor
    Entropy {
        #[command(flatten)]
        prefix: PrefixArgs,
    },

    /// Top-2 ghost suggestion at a cursor
    Ghost {
        #[command(flatten)]
        prefix: PrefixArgs,
    },

    /// Closing-token expectation at a cursor
    Autopanic {
        #[command(flatten)]
        prefix: PrefixArgs,
    },

    /// Which earlier identifiers the prediction at a cursor depends on
    Saliency {
        #[command(flatten)]
        source: SourceArgs,

        /// Cursor line (1-based)
        #[arg(long)]
        line: usize,

        /// Cursor character within the line (0-based)
        #[arg(long)]
        character: usize,

        #[arg(long)]
        uri: Option<String>,
    },

    /// Precompute every cursor position of a file into a replay artifact
    Precompute {
        #[command(flatten)]
        source: SourceArgs,

        /// Artifact path
        #[arg(short, long, default_value = "precomputed.json")]
        output: PathBuf,
    },

    /// Precompute the built-in demo code states
    #[command(name = "precompute-demo")]
    PrecomputeDemo {
        /// Artifact path
        #[arg(short, long, default_value = "demo_precomputed.json")]
        output: PathBuf,
    },

    /// Summarize a persisted artifact
    Inspect {
        path: PathBuf,

        /// The artifact was written by precompute-demo
        #[arg(long)]
        demo: bool,
    },

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::try_parse_from(["hud", "version"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Version));
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["hud", "entropy", "--prefix", "def f(", "--mock"]).unwrap();
        assert!(cli.mock);
        if let Commands::Entropy { prefix } = cli.command {
            assert_eq!(prefix.prefix.as_deref(), Some("def f("));
        } else {
            panic!("Expected Entropy command");
        }
    }

    #[test]
    fn test_cli_parse_cursor_needs_both_coordinates() {
        assert!(Cli::try_parse_from(["hud", "ghost", "--file", "a.py", "--line", "2"]).is_err());
        let cli = Cli::try_parse_from([
            "hud",
            "ghost",
            "--file",
            "a.py",
            "--line",
            "2",
            "--character",
            "4",
        ]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_parse_prefix_conflicts_with_file() {
        let cli = Cli::try_parse_from(["hud", "autopanic", "--prefix", "x", "--file", "a.py"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_precompute_default_output() {
        let cli = Cli::try_parse_from(["hud", "precompute", "-f", "demo.py"]).unwrap();
        if let Commands::Precompute { source, output } = cli.command {
            assert_eq!(source.file, Some(PathBuf::from("demo.py")));
            assert_eq!(output, PathBuf::from("precomputed.json"));
        } else {
            panic!("Expected Precompute command");
        }
    }

    #[test]
    fn test_cli_parse_subcommand_names() {
        for args in [
            vec!["hud", "precompute-demo"],
            vec!["hud", "inspect", "out.json", "--demo"],
            vec!["hud", "saliency", "--line", "3", "--character", "0"],
            vec!["hud", "analyze", "--uri", "file:///a.py"],
        ] {
            let cli = Cli::try_parse_from(args.clone());
            assert!(cli.is_ok(), "Failed to parse {:?}", args);
        }
    }
}
