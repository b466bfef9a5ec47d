pub mod cli;
pub mod commands;
pub mod logging;

#[cfg(test)]
pub mod test_util;

use std::io::{Read, Write};

use clap::Parser;

use fieldguide_lib::output::ConsoleIO;
use fieldguide_lib::runtime::Runtime;

use cli::{Cli, Command, ModelCommand};

/// Main CLI entry point. Parses args and dispatches to the appropriate command.
pub fn try_run<IN, OUT, ERR>(
    args: &[&str],
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    let cli = Cli::try_parse_from(args)?;

    match cli.command {
        Command::Identify { image } => commands::identify::run_identify(&image, runtime, io),
        Command::Ask {
            question,
            context,
            snippets,
            threshold,
            max_new_tokens,
            temperature,
        } => {
            let source = match (context, snippets) {
                (Some(text), _) => commands::ask::ContextSource::Text(text),
                (None, Some(dir)) => commands::ask::ContextSource::Snippets { dir, threshold },
                (None, None) => anyhow::bail!("Either --context or --snippets is required."),
            };
            let params = fieldguide_lib::config::GenerationParams {
                max_new_tokens,
                temperature,
            };
            commands::ask::run_ask(&question, source, params, runtime, io)
        }
        Command::Search {
            query,
            snippets,
            threshold,
            score,
        } => commands::search::run_search(&query, &snippets, threshold, score, runtime, io),
        Command::Snippets { dir } => commands::snippets::run_list_snippets(&dir, io),
        Command::Model { model_command } => match model_command {
            ModelCommand::Download { force } => {
                commands::model::run_model_download(force, runtime, io)
            }
        },
    }
}
