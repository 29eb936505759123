mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;

fn main() -> anyhow::Result<()> {
    // Logs on stderr, results on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    // Only commands that talk to the oracle read the config file
    let ctx = || Context::load(cli.mock, cli.config.as_deref());

    match cli.command {
        Commands::Analyze { source, uri } => commands::analyze::run(&ctx()?, &source, uri),
        Commands::Entropy { prefix } => commands::entropy::run(&ctx()?, &prefix),
        Commands::Ghost { prefix } => commands::ghost::run(&ctx()?, &prefix),
        Commands::Autopanic { prefix } => commands::autopanic::run(&ctx()?, &prefix),
        Commands::Saliency {
            source,
            line,
            character,
            uri,
        } => commands::saliency::run(&ctx()?, &source, line, character, uri),
        Commands::Precompute { source, output } => {
            commands::precompute::run(&ctx()?, &source, &output)
        }
        Commands::PrecomputeDemo { output } => {
            commands::precompute_demo::run(&ctx()?, &output)
        }
        Commands::Inspect { path, demo } => commands::inspect::run(&path, demo),
        Commands::Version => commands::version::run(),
    }
}
