use tracing::debug;

use super::Snippets;
use crate::config::DEFAULT_SIMILARITY_THRESHOLD;
use crate::embedding::TextEmbedder;
use crate::embedding::similarity::cosine_similarity;

/// The snippet chosen for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnippetMatch<'a> {
    /// Snippet name (source file name).
    pub name: &'a str,
    /// Full snippet text.
    pub text: &'a str,
    /// Highest cosine similarity across all snippets.
    ///
    /// When the keyword fallback replaced the winner this is still the top
    /// similarity score, not the score of the returned snippet.
    pub score: f32,
    /// `true` when the keyword fallback chose the snippet.
    pub fallback: bool,
}

impl<'a> SnippetMatch<'a> {
    pub fn into_text(self) -> &'a str {
        self.text
    }

    pub fn into_scored(self) -> (&'a str, f32) {
        (self.text, self.score)
    }
}

/// Semantic snippet search with a keyword fallback for weak matches.
///
/// Owns the embedding component for its whole lifetime; build one per
/// process and reuse it for every query.
pub struct Retriever<E> {
    embedder: E,
    threshold: f32,
}

impl<E: TextEmbedder> Retriever<E> {
    /// Create a retriever using [`DEFAULT_SIMILARITY_THRESHOLD`].
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Replace the similarity threshold. Must lie in \[-1, 1\].
    pub fn with_threshold(mut self, threshold: f32) -> anyhow::Result<Self> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        Ok(self)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Find the snippet most relevant to `query`. See [`get_top_snippet`].
    pub fn top_snippet<'a>(
        &mut self,
        query: &str,
        snippets: &'a Snippets,
    ) -> anyhow::Result<SnippetMatch<'a>> {
        get_top_snippet(&mut self.embedder, query, snippets, self.threshold)
    }
}

/// Rank `snippets` by cosine similarity to `query` and return the best one.
///
/// Ties go to the first snippet in name order. When the best score is below
/// `threshold`, the first snippet whose lowercased text contains any
/// lowercased query word (plain substring match) replaces the winner; if none
/// does, the semantic winner stands. The returned score is always the best
/// similarity score.
pub fn get_top_snippet<'a, E>(
    embedder: &mut E,
    query: &str,
    snippets: &'a Snippets,
    threshold: f32,
) -> anyhow::Result<SnippetMatch<'a>>
where
    E: TextEmbedder + ?Sized,
{
    if query.trim().is_empty() {
        anyhow::bail!("Query must not be empty");
    }
    if snippets.is_empty() {
        anyhow::bail!("No snippets to search");
    }
    validate_threshold(threshold)?;

    let texts: Vec<&str> = snippets.values().map(String::as_str).collect();
    let snippet_embeddings = embedder.embed_batch(&texts)?;
    if snippet_embeddings.len() != texts.len() {
        anyhow::bail!(
            "Embedder returned {} vectors for {} snippets",
            snippet_embeddings.len(),
            texts.len()
        );
    }
    let Some(query_embedding) = embedder.embed_batch(&[query])?.into_iter().next() else {
        anyhow::bail!("Embedder returned no vector for the query");
    };

    let mut best: Option<(usize, f32)> = None;
    for (idx, (name, embedding)) in snippets.keys().zip(&snippet_embeddings).enumerate() {
        if embedding.len() != query_embedding.len() {
            anyhow::bail!(
                "Embedding dimension mismatch: query has {}, snippet {name} has {}",
                query_embedding.len(),
                embedding.len()
            );
        }
        let score = cosine_similarity(&query_embedding, embedding);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((idx, score));
        }
    }
    let Some((top_idx, top_score)) = best else {
        anyhow::bail!("No snippets to search");
    };

    let (mut name, mut text) = snippets
        .iter()
        .nth(top_idx)
        .map(|(name, text)| (name.as_str(), text.as_str()))
        .unwrap_or_default();
    let mut fallback = false;

    debug!(
        top = name,
        score = top_score,
        threshold = threshold,
        "Semantic ranking done"
    );

    if top_score < threshold
        && let Some((kw_name, kw_text)) = keyword_match(query, snippets)
    {
        debug!(
            semantic_top = name,
            keyword_match = kw_name,
            "Below threshold, using keyword fallback"
        );
        name = kw_name;
        text = kw_text;
        fallback = true;
    }

    Ok(SnippetMatch {
        name,
        text,
        score: top_score,
        fallback,
    })
}

/// First snippet (in name order) whose lowercased text contains any
/// whitespace-separated lowercased query word.
fn keyword_match<'a>(query: &str, snippets: &'a Snippets) -> Option<(&'a str, &'a str)> {
    let query = query.to_lowercase();
    let words: Vec<&str> = query.split_whitespace().collect();
    snippets
        .iter()
        .find(|(_, text)| {
            let haystack = text.to_lowercase();
            words.iter().any(|word| haystack.contains(word))
        })
        .map(|(name, text)| (name.as_str(), text.as_str()))
}

fn validate_threshold(threshold: f32) -> anyhow::Result<()> {
    if !(-1.0..=1.0).contains(&threshold) {
        anyhow::bail!("Similarity threshold must be between -1 and 1, got {threshold}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use fieldguide_test_util::snippets::snippets_of;

    use super::*;
    use crate::test_util::{StubEmbedder, vocab_embedder};

    #[test]
    fn identical_snippet_wins() {
        let snippets = snippets_of(&[
            ("a.txt", "Red foxes hunt small rodents at dusk"),
            ("b.txt", "Exchange rates rose today"),
            ("c.txt", "how do red foxes hunt"),
        ]);
        let mut embedder = vocab_embedder();

        let found = get_top_snippet(&mut embedder, "how do red foxes hunt", &snippets, 0.35).unwrap();

        assert_eq!(found.name, "c.txt");
        assert_eq!(found.text, "how do red foxes hunt");
        assert!((found.score - 1.0).abs() < 1e-5);
        assert!(!found.fallback);
    }

    #[test]
    fn snippets_and_query_are_embedded_with_the_same_embedder() {
        let snippets = snippets_of(&[("a.txt", "barn owl"), ("b.txt", "grey heron")]);
        let mut embedder = vocab_embedder();

        get_top_snippet(&mut embedder, "owl", &snippets, 0.35).unwrap();

        assert_eq!(embedder.calls(), 2);
    }

    #[test]
    fn low_score_falls_back_to_exchange_keyword() {
        let snippets = snippets_of(&[
            ("a.txt", "The quick brown fox"),
            ("b.txt", "Exchange rates rose today"),
        ]);
        let mut embedder = vocab_embedder();

        let found =
            get_top_snippet(&mut embedder, "finance economy exchange", &snippets, 0.9).unwrap();

        assert_eq!(found.text, "Exchange rates rose today");
        assert!(found.fallback);
        // 1 shared word out of 3 query words and 4 snippet words.
        let expected = 1.0 / (3.0_f32.sqrt() * 4.0_f32.sqrt());
        assert!((found.score - expected).abs() < 1e-5);
    }

    #[test]
    fn fallback_pick_keeps_the_top_similarity_score() {
        // "cat" is only a substring of "Category"; b.txt shares a whole word.
        let snippets = snippets_of(&[
            ("a.txt", "Category theory for beginners"),
            ("b.txt", "nutrition labels explained in detail today"),
        ]);
        let mut embedder = vocab_embedder();

        let (text, score) = get_top_snippet(&mut embedder, "cat nutrition", &snippets, 0.35)
            .unwrap()
            .into_scored();

        assert_eq!(text, "Category theory for beginners");
        let b_score = 1.0 / (2.0_f32.sqrt() * 6.0_f32.sqrt());
        assert!((score - b_score).abs() < 1e-5);
    }

    #[test]
    fn strong_match_skips_fallback() {
        let snippets = snippets_of(&[
            ("a.txt", "owlets grow fast"),
            ("b.txt", "barn owl habitat"),
        ]);
        let mut embedder = vocab_embedder();

        let found = get_top_snippet(&mut embedder, "barn owl habitat", &snippets, 0.9).unwrap();

        assert_eq!(found.name, "b.txt");
        assert!(!found.fallback);
    }

    #[test]
    fn no_keyword_match_keeps_semantic_winner() {
        let snippets = snippets_of(&[
            ("a.txt", "Barn owls hunt at night"),
            ("b.txt", "Exchange rates rose today"),
        ]);
        let mut embedder = vocab_embedder();

        let found = get_top_snippet(&mut embedder, "zebra", &snippets, 0.35).unwrap();

        // All scores are 0, so the first snippet wins the argmax.
        assert_eq!(found.name, "a.txt");
        assert!(found.score.abs() < f32::EPSILON);
        assert!(!found.fallback);
    }

    #[test]
    fn fallback_is_case_insensitive() {
        let snippets = snippets_of(&[
            ("a.txt", "Herons wade in shallow water"),
            ("b.txt", "EXCHANGE RATES ROSE TODAY"),
        ]);
        let mut embedder = vocab_embedder();

        let found = get_top_snippet(&mut embedder, "Which Exchange rate", &snippets, 0.35).unwrap();

        assert_eq!(found.name, "b.txt");
        assert!(found.fallback);
    }

    #[test]
    fn fallback_words_keep_their_punctuation() {
        let snippets = snippets_of(&[
            ("a.txt", "Herons wade in shallow water"),
            ("b.txt", "Exchange rates rose today"),
        ]);
        let mut embedder = vocab_embedder();

        // Semantic score 0.5 is below 0.9, but "exchange!" is not a substring.
        let found = get_top_snippet(&mut embedder, "exchange!", &snippets, 0.9).unwrap();

        assert_eq!(found.name, "b.txt");
        assert!(!found.fallback);
    }

    #[test]
    fn ties_go_to_first_name() {
        let snippets = snippets_of(&[("b.txt", "grey heron"), ("a.txt", "grey heron")]);
        let mut embedder = vocab_embedder();

        let found = get_top_snippet(&mut embedder, "grey heron", &snippets, 0.35).unwrap();

        assert_eq!(found.name, "a.txt");
    }

    #[test]
    fn result_always_comes_from_the_collection() {
        let snippets = snippets_of(&[
            ("a.txt", "Barn owls hunt at night"),
            ("b.txt", "Exchange rates rose today"),
            ("c.txt", "Red foxes are omnivores"),
        ]);
        let mut embedder = vocab_embedder();

        for query in ["owl", "rates", "omnivores diet", "something else entirely", "x"] {
            let found = get_top_snippet(&mut embedder, query, &snippets, 0.35).unwrap();
            assert_eq!(snippets.get(found.name).map(String::as_str), Some(found.text));
        }
    }

    #[test]
    fn empty_query_is_rejected() {
        let snippets = snippets_of(&[("a.txt", "Barn owls hunt at night")]);
        let mut embedder = vocab_embedder();

        for query in ["", "   \n\t"] {
            let err = get_top_snippet(&mut embedder, query, &snippets, 0.35).unwrap_err();
            assert_eq!(err.to_string(), "Query must not be empty");
        }
        assert_eq!(embedder.calls(), 0);
    }

    #[test]
    fn empty_collection_is_rejected() {
        let mut embedder = vocab_embedder();
        let err = get_top_snippet(&mut embedder, "owl", &Snippets::new(), 0.35).unwrap_err();
        assert_eq!(err.to_string(), "No snippets to search");
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let snippets = snippets_of(&[("a.txt", "Barn owls hunt at night")]);
        let mut embedder = vocab_embedder();

        let err = get_top_snippet(&mut embedder, "owl", &snippets, 1.5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Similarity threshold must be between -1 and 1, got 1.5"
        );
        assert!(get_top_snippet(&mut embedder, "owl", &snippets, f32::NAN).is_err());
    }

    #[test]
    fn short_embedding_batch_is_an_error() {
        let snippets = snippets_of(&[("a.txt", "one"), ("b.txt", "two")]);
        let mut embedder = StubEmbedder::returning(vec![vec![1.0, 0.0]]);

        let err = get_top_snippet(&mut embedder, "one", &snippets, 0.35).unwrap_err();
        assert_eq!(err.to_string(), "Embedder returned 1 vectors for 2 snippets");
    }

    #[test]
    fn mismatched_dimensions_are_an_error() {
        let snippets = snippets_of(&[("a.txt", "one"), ("b.txt", "two")]);
        let mut embedder = StubEmbedder::returning(vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]]);

        let err = get_top_snippet(&mut embedder, "one", &snippets, 0.35).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Embedding dimension mismatch: query has 2, snippet b.txt has 3"
        );
    }

    #[test]
    fn score_equal_to_threshold_keeps_semantic_winner() {
        // Query vector is the first one returned, so a.txt scores exactly 1.0.
        let snippets = snippets_of(&[("a.txt", "zzz"), ("b.txt", "owl here")]);
        let mut embedder = StubEmbedder::returning(vec![vec![1.0, 0.0], vec![0.6, 0.8]]);

        let found = get_top_snippet(&mut embedder, "owl", &snippets, 1.0).unwrap();

        assert_eq!(found.name, "a.txt");
        assert!(!found.fallback);
        assert!((found.score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn retriever_uses_default_threshold() {
        let retriever = Retriever::new(vocab_embedder());
        assert!((retriever.threshold() - DEFAULT_SIMILARITY_THRESHOLD).abs() < f32::EPSILON);
    }

    #[test]
    fn retriever_threshold_is_validated() {
        assert!(Retriever::new(vocab_embedder()).with_threshold(-1.0).is_ok());
        assert!(Retriever::new(vocab_embedder()).with_threshold(-1.01).is_err());
    }

    #[test]
    fn retriever_is_reused_across_queries() {
        let snippets = snippets_of(&[
            ("a.txt", "Barn owls hunt at night"),
            ("b.txt", "Exchange rates rose today"),
        ]);
        let mut retriever = Retriever::new(vocab_embedder()).with_threshold(0.2).unwrap();

        let first = retriever.top_snippet("barn owls", &snippets).unwrap();
        let second = retriever.top_snippet("exchange rates", &snippets).unwrap();

        assert_eq!(first.into_text(), "Barn owls hunt at night");
        assert_eq!(second.into_text(), "Exchange rates rose today");
    }
}
