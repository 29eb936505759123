use super::{block_on, print_json, read_source, source_uri, Context};
use crate::cli::SourceArgs;

pub fn run(
    ctx: &Context,
    source: &SourceArgs,
    line: usize,
    character: usize,
    uri: Option<String>,
) -> anyhow::Result<()> {
    let code = read_source(source)?;
    let uri = source_uri(source, uri);
    let analyzer = ctx.analyzer()?;

    let batch = block_on(analyzer.compute_saliency(&code, &uri, line, character))??;
    print_json(&batch)
}
