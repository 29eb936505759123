use super::{block_on, print_json, resolve_prefix, Context};
use crate::cli::PrefixArgs;

/// Prints `null` when the oracle offered fewer than two candidates
pub fn run(ctx: &Context, args: &PrefixArgs) -> anyhow::Result<()> {
    let prefix = resolve_prefix(args)?;
    let analyzer = ctx.analyzer()?;

    let ghost = block_on(analyzer.compute_ghost(&prefix))??;
    print_json(&ghost)
}
