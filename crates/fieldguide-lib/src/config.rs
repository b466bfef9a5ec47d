use std::path::PathBuf;

use serde::Serialize;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIMENSION: usize = 384;

/// Minimum cosine similarity for a semantic match to be accepted without
/// falling back to keyword matching.
///
/// all-MiniLM-L6-v2 similarities for related short passages usually land
/// between 0.4 and 0.8.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.35;

/// File extension (without the dot) of snippet files in a knowledge folder.
pub const SNIPPET_EXTENSION: &str = "txt";

/// Environment variable holding the Hugging Face API token.
pub const API_KEY_ENV: &str = "HUGGINGFACE_API_KEY";

/// Environment variable overriding the image classification endpoint.
pub const IMAGE_MODEL_URL_ENV: &str = "FIELDGUIDE_IMAGE_MODEL_URL";

/// Environment variable overriding the text generation endpoint.
pub const TEXT_MODEL_URL_ENV: &str = "FIELDGUIDE_TEXT_MODEL_URL";

/// Environment variable overriding the embedding model cache directory.
pub const MODEL_DIR_ENV: &str = "FIELDGUIDE_MODEL_DIR";

/// BEiT-Large image classifier.
pub const DEFAULT_IMAGE_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/beit-large-patch16-224";

/// Mistral-7B-Instruct text generation model.
pub const DEFAULT_TEXT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";

/// Returned when the image endpoint fails or answers with an unexpected shape.
pub const UNKNOWN_SPECIES: &str = "Unknown Species";

/// Returned when the text endpoint fails or answers with an unexpected shape.
pub const ANSWER_FAILURE: &str = "Sorry, I couldn't generate an answer.";

/// Marker closing the prompt; generated text after its last occurrence is the answer.
pub const ANSWER_MARKER: &str = "Answer:";

pub const DEFAULT_MAX_NEW_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Credentials and endpoints for the remote inference API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
    pub image_model_url: String,
    pub text_model_url: String,
}

impl ApiConfig {
    /// Build the config from the process environment.
    ///
    /// Fails when [`API_KEY_ENV`] is unset or empty. Endpoint URLs fall back
    /// to the Hugging Face defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(missing_api_key)?;

        Ok(Self {
            api_key,
            image_model_url: lookup(IMAGE_MODEL_URL_ENV)
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL_URL.to_string()),
            text_model_url: lookup(TEXT_MODEL_URL_ENV)
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL_URL.to_string()),
        })
    }
}

/// Error reported when [`API_KEY_ENV`] is not configured.
pub fn missing_api_key() -> anyhow::Error {
    anyhow::anyhow!("{API_KEY_ENV} not found in environment or .env file!")
}

/// Sampling parameters sent with every text generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Resolve the embedding model cache directory.
///
/// Checks [`MODEL_DIR_ENV`] first, falling back to `~/.fieldguide/models/`.
pub fn default_model_cache_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let Some(home) = dirs::home_dir() else {
        anyhow::bail!("Cannot determine home directory. Set {MODEL_DIR_ENV} instead.");
    };
    Ok(home.join(".fieldguide").join("models"))
}
