use super::{block_on, print_json, resolve_prefix, Context};
use crate::cli::PrefixArgs;

pub fn run(ctx: &Context, args: &PrefixArgs) -> anyhow::Result<()> {
    let prefix = resolve_prefix(args)?;
    let analyzer = ctx.analyzer()?;

    let result = block_on(analyzer.compute_entropy(&prefix))??;
    print_json(&result)
}
