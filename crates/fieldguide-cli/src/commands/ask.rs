use std::io::{Read, Write};
use std::path::PathBuf;

use fieldguide_lib::config::{ANSWER_FAILURE, GenerationParams};
use fieldguide_lib::embedding::TextEmbedder;
use fieldguide_lib::inference::client::InferenceClient;
use fieldguide_lib::output::ConsoleIO;
use fieldguide_lib::retrieval::Snippets;
use fieldguide_lib::retrieval::ranker::Retriever;
use fieldguide_lib::runtime::Runtime;
use tracing::debug;

use super::snippets::load_required_snippets;

/// Where the context for a question comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextSource {
    /// Context given verbatim.
    Text(String),
    /// The most relevant snippet in a folder.
    Snippets { dir: PathBuf, threshold: f32 },
}

/// Run the `fieldguide ask` command.
///
/// API failures are reported on stdout followed by the apology placeholder;
/// the command itself still succeeds.
pub fn run_ask<IN, OUT, ERR>(
    question: &str,
    source: ContextSource,
    params: GenerationParams,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    let client = InferenceClient::new(runtime.api()?.clone()).with_generation_params(params);

    match source {
        ContextSource::Text(text) => print_answer(&client, question, &text, io),
        ContextSource::Snippets { dir, threshold } => {
            let snippets = load_required_snippets(&dir)?;
            let mut retriever =
                Retriever::new(runtime.load_embedder()?).with_threshold(threshold)?;
            answer_from_snippets(&mut retriever, &snippets, &client, question, io)
        }
    }
}

/// Answer `question` using the snippet `retriever` picks as context.
pub fn answer_from_snippets<E, IN, OUT, ERR>(
    retriever: &mut Retriever<E>,
    snippets: &Snippets,
    client: &InferenceClient,
    question: &str,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    E: TextEmbedder,
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    let found = retriever.top_snippet(question, snippets)?;
    debug!(
        snippet = found.name,
        score = found.score,
        fallback = found.fallback,
        "Context retrieved"
    );
    print_answer(client, question, found.into_text(), io)
}

fn print_answer<IN, OUT, ERR>(
    client: &InferenceClient,
    question: &str,
    context: &str,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    match client.answer_question(question, context) {
        Ok(answer) => writeln!(io.stdout(), "{answer}")?,
        Err(failure) => {
            writeln!(io.stdout(), "{failure}")?;
            writeln!(io.stdout(), "{ANSWER_FAILURE}")?;
        }
    }
    Ok(())
}
