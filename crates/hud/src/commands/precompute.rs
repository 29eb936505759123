use super::{block_on, read_source, Context};
use crate::cli::SourceArgs;
use anyhow::Context as _;
use hud_precompute::Pipeline;
use std::path::Path;
use tracing::info;

pub fn run(ctx: &Context, source: &SourceArgs, output: &Path) -> anyhow::Result<()> {
    let code = read_source(source)?;
    let pipeline = Pipeline::new(ctx.analyzer()?);

    let store = block_on(pipeline.precompute(&code))??;
    store
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        path = %output.display(),
        token_ranks = store.token_ranks.len(),
        ghosts = store.ghosts.len(),
        entropies = store.entropies.len(),
        saliencies = store.saliencies.len(),
        "saved precomputed data"
    );
    Ok(())
}
