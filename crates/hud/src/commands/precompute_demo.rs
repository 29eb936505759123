use super::{block_on, Context};
use anyhow::Context as _;
use hud_precompute::{Pipeline, DEMO_CODE_STATES};
use std::path::Path;
use tracing::info;

pub fn run(ctx: &Context, output: &Path) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(ctx.analyzer()?);

    let artifact = block_on(pipeline.precompute_demo(DEMO_CODE_STATES))??;
    artifact
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        path = %output.display(),
        states = artifact.demo_states.states.len(),
        full_code_positions = artifact.full_code.entropies.len(),
        "saved demo data"
    );
    Ok(())
}
