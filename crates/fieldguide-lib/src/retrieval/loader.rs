use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use super::Snippets;
use crate::config::SNIPPET_EXTENSION;

/// Load every `.txt` file directly inside `folder` as a snippet keyed by its
/// file name.
///
/// Sub-directories and files with other extensions are ignored. Any read or
/// UTF-8 decoding failure fails the whole call.
pub fn load_knowledge_snippets(folder: &Path) -> anyhow::Result<Snippets> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read snippet folder {}", folder.display()))?;

    let mut snippets = Snippets::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to list snippet folder {}", folder.display()))?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            anyhow::bail!("Snippet file name is not valid UTF-8: {}", path.display());
        };
        if !has_snippet_extension(&name) || !path.is_file() {
            continue;
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snippet {}", path.display()))?;
        snippets.insert(name, text);
    }

    debug!(
        folder = %folder.display(),
        snippet_count = snippets.len(),
        "Snippets loaded"
    );
    Ok(snippets)
}

/// Case-sensitive `.txt` suffix check on the file name.
fn has_snippet_extension(name: &str) -> bool {
    name.strip_suffix(SNIPPET_EXTENSION)
        .is_some_and(|stem| stem.ends_with('.'))
}
