pub mod embedder;
pub mod similarity;

/// Turns text into fixed-length vectors.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector for the lifetime of the instance.
pub trait TextEmbedder {
    /// Embed a batch of texts, returning one vector per input in order.
    fn embed_batch(&mut self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;
}
