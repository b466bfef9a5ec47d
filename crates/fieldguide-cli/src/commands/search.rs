use std::io::{Read, Write};
use std::path::Path;

use fieldguide_lib::embedding::TextEmbedder;
use fieldguide_lib::output::ConsoleIO;
use fieldguide_lib::retrieval::Snippets;
use fieldguide_lib::retrieval::ranker::Retriever;
use fieldguide_lib::runtime::Runtime;
use tracing::debug;

use super::snippets::load_required_snippets;

/// Run the `fieldguide search` command.
pub fn run_search<IN, OUT, ERR>(
    query: &str,
    dir: &Path,
    threshold: f32,
    show_score: bool,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    let snippets = load_required_snippets(dir)?;
    let mut retriever = Retriever::new(runtime.load_embedder()?).with_threshold(threshold)?;
    print_top_snippet(&mut retriever, query, &snippets, show_score, io)
}

/// Retrieve the best snippet for `query` and write it to stdout.
///
/// With `show_score`, a header line with the snippet name and the top
/// similarity score precedes the text.
pub fn print_top_snippet<E, IN, OUT, ERR>(
    retriever: &mut Retriever<E>,
    query: &str,
    snippets: &Snippets,
    show_score: bool,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    E: TextEmbedder,
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    let found = retriever.top_snippet(query, snippets)?;
    debug!(
        snippet = found.name,
        score = found.score,
        fallback = found.fallback,
        "Top snippet selected"
    );

    if show_score {
        let via = if found.fallback { ", keyword fallback" } else { "" };
        writeln!(
            io.stdout(),
            "## {} (similarity: {:.4}{via})",
            found.name,
            found.score
        )?;
    }
    writeln!(io.stdout(), "{}", found.into_text())?;
    Ok(())
}
