pub mod loader;
pub mod ranker;

use std::collections::BTreeMap;

/// Snippet name (source file name) to full snippet text.
///
/// Sorted by name, which fixes the order used for ranking ties and for the
/// keyword fallback scan.
pub type Snippets = BTreeMap<String, String>;
