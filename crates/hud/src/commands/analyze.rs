use super::{block_on, print_json, read_source, source_uri, Context};
use crate::cli::SourceArgs;

pub fn run(ctx: &Context, source: &SourceArgs, uri: Option<String>) -> anyhow::Result<()> {
    let code = read_source(source)?;
    let uri = source_uri(source, uri);
    let analyzer = ctx.analyzer()?;

    let probs = block_on(analyzer.analyze_tokens(&code, &uri))??;
    print_json(&probs)
}
