use fieldguide_test_util::vocab::VocabEmbedder;

use crate::embedding::TextEmbedder;

impl TextEmbedder for VocabEmbedder {
    fn embed_batch(&mut self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(self.embed(texts))
    }
}

/// Create a fresh bag-of-words embedder.
pub fn vocab_embedder() -> VocabEmbedder {
    VocabEmbedder::new()
}

/// Embedder that answers every batch with the same canned vectors.
pub struct StubEmbedder {
    vectors: Vec<Vec<f32>>,
}

impl StubEmbedder {
    pub fn returning(vectors: Vec<Vec<f32>>) -> Self {
        Self { vectors }
    }
}

impl TextEmbedder for StubEmbedder {
    fn embed_batch(&mut self, _texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(self.vectors.clone())
    }
}
