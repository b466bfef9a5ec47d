use std::collections::BTreeMap;
use std::path::Path;

/// Build an in-memory snippet collection from `(name, text)` pairs.
pub fn snippets_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(name, text)| ((*name).to_string(), (*text).to_string()))
        .collect()
}

/// Write each `(file_name, content)` pair into `dir`.
pub fn write_snippets(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        std::fs::write(dir.join(name), content).unwrap();
    }
}

/// Create a temporary knowledge folder holding the given files.
///
/// The caller must hold the returned [`tempfile::TempDir`] for as long as the
/// folder is needed.
pub fn snippet_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    write_snippets(tmp.path(), files);
    tmp
}
