use std::path::PathBuf;

use crate::config::{ApiConfig, default_model_cache_dir, missing_api_key};
use crate::embedding::embedder::Embedder;

/// Process-wide settings handed to every command.
pub struct Runtime {
    /// Directory holding downloaded embedding models.
    pub model_cache_dir: PathBuf,
    /// `None` when no API key is configured; inference commands then fail.
    pub api: Option<ApiConfig>,
}

impl Runtime {
    /// Resolve the runtime from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            model_cache_dir: default_model_cache_dir()?,
            api: ApiConfig::from_env().ok(),
        })
    }

    /// API settings, or the missing-key error for inference commands.
    pub fn api(&self) -> anyhow::Result<&ApiConfig> {
        self.api.as_ref().ok_or_else(missing_api_key)
    }

    /// Load the embedding model from [`Self::model_cache_dir`].
    pub fn load_embedder(&self) -> anyhow::Result<Embedder> {
        Embedder::new(&self.model_cache_dir)
    }
}
