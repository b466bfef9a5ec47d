use std::fs;
use std::path::Path;

use anyhow::Context;
use fastembed::{
    InitOptionsUserDefined, Pooling, TextEmbedding, TokenizerFiles, UserDefinedEmbeddingModel,
};
use tracing::debug;

use super::TextEmbedder;
use crate::config::EMBEDDING_DIMENSION;

/// Subdirectory name under `model_cache_dir` for all-MiniLM-L6-v2 files.
pub const MODEL_SUBDIR: &str = "all-MiniLM-L6-v2";

/// Model files expected in `model_cache_dir/all-MiniLM-L6-v2/`.
pub const MODEL_FILES: &[&str] = &[
    "model.onnx",
    "tokenizer.json",
    "config.json",
    "special_tokens_map.json",
    "tokenizer_config.json",
];

/// Sentence embedder backed by fastembed's `TextEmbedding`.
///
/// Loads all-MiniLM-L6-v2 from disk once; the weights are never modified
/// afterwards, so one instance serves every retrieval in the process.
pub struct Embedder {
    model: TextEmbedding,
}

impl Embedder {
    /// Load all-MiniLM-L6-v2 from `model_cache_dir/all-MiniLM-L6-v2/`.
    ///
    /// If the model files are not found, returns an error instructing the user
    /// to run `fieldguide model download`.
    pub fn new(model_cache_dir: &Path) -> anyhow::Result<Self> {
        let base = model_cache_dir.join(MODEL_SUBDIR);

        let onnx_bytes = fs::read(base.join("model.onnx")).with_context(|| {
            format!(
                "Model not found at {}. Run 'fieldguide model download' first.",
                base.display()
            )
        })?;

        let tokenizer_files = TokenizerFiles {
            tokenizer_file: fs::read(base.join("tokenizer.json"))
                .context("Missing tokenizer.json")?,
            config_file: fs::read(base.join("config.json")).context("Missing config.json")?,
            special_tokens_map_file: fs::read(base.join("special_tokens_map.json"))
                .context("Missing special_tokens_map.json")?,
            tokenizer_config_file: fs::read(base.join("tokenizer_config.json"))
                .context("Missing tokenizer_config.json")?,
        };

        let user_model =
            UserDefinedEmbeddingModel::new(onnx_bytes, tokenizer_files).with_pooling(Pooling::Mean);

        let model =
            TextEmbedding::try_new_from_user_defined(user_model, InitOptionsUserDefined::default())
                .context("Failed to initialize all-MiniLM-L6-v2 model")?;

        debug!(model_dir = %base.display(), "Embedding model loaded");

        Ok(Self { model })
    }

    /// Return the embedding dimension (384 for all-MiniLM-L6-v2).
    #[must_use]
    pub const fn dimension() -> usize {
        EMBEDDING_DIMENSION
    }
}

impl TextEmbedder for Embedder {
    fn embed_batch(&mut self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let owned: Vec<String> = texts.iter().map(|s| (*s).to_string()).collect();
        let embeddings = self
            .model
            .embed(owned, None)
            .context("Failed to embed texts")?;
        Ok(embeddings)
    }
}
