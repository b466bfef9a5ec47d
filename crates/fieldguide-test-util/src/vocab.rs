use std::collections::HashMap;

/// Dimension of vectors produced by [`VocabEmbedder`].
pub const VOCAB_DIMENSION: usize = 512;

/// Bag-of-words embedder for tests that must not load an ONNX model.
///
/// Each distinct lowercased word gets its own axis the first time it is seen,
/// so identical texts map to identical vectors and texts with no words in
/// common are orthogonal.
#[derive(Debug, Default)]
pub struct VocabEmbedder {
    vocabulary: HashMap<String, usize>,
    calls: usize,
}

impl VocabEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn embed(&mut self, texts: &[&str]) -> Vec<Vec<f32>> {
        self.calls += 1;
        texts.iter().map(|text| self.embed_one(text)).collect()
    }

    /// Number of `embed` calls so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    fn embed_one(&mut self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; VOCAB_DIMENSION];
        for word in words(text) {
            let next = self.vocabulary.len();
            let axis = *self.vocabulary.entry(word).or_insert(next);
            assert!(axis < VOCAB_DIMENSION, "test vocabulary exhausted");
            vector[axis] += 1.0;
        }
        vector
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}
