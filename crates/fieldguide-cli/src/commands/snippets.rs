use std::io::{Read, Write};
use std::path::Path;

use fieldguide_lib::output::ConsoleIO;
use fieldguide_lib::retrieval::Snippets;
use fieldguide_lib::retrieval::loader::load_knowledge_snippets;

/// Load snippets from `dir`, failing if the folder holds none.
pub fn load_required_snippets(dir: &Path) -> anyhow::Result<Snippets> {
    let snippets = load_knowledge_snippets(dir)?;
    if snippets.is_empty() {
        anyhow::bail!("No snippets found in {}", dir.display());
    }
    Ok(snippets)
}

/// Run the `fieldguide snippets` command.
pub fn run_list_snippets<IN, OUT, ERR>(
    dir: &Path,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    let snippets = load_knowledge_snippets(dir)?;

    if snippets.is_empty() {
        writeln!(io.stdout(), "No snippets found in {}.", dir.display())?;
        return Ok(());
    }

    for (name, text) in &snippets {
        writeln!(io.stdout(), "{name} ({} chars)", text.chars().count())?;
    }
    Ok(())
}
