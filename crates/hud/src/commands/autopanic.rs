use super::{block_on, print_json, resolve_prefix, Context};
use crate::cli::PrefixArgs;

pub fn run(ctx: &Context, args: &PrefixArgs) -> anyhow::Result<()> {
    let prefix = resolve_prefix(args)?;
    let analyzer = ctx.analyzer()?;

    let result = block_on(analyzer.compute_autopanic(&prefix))??;
    if result.expecting_close {
        tracing::info!(
            confidence = result.confidence,
            top = result.top_close_token.as_deref().unwrap_or(""),
            "model expects a closing token"
        );
    }
    print_json(&result)
}
