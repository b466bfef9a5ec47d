use fieldguide_lib::config::ApiConfig;
use fieldguide_lib::embedding::TextEmbedder;
use fieldguide_lib::runtime::Runtime;
use fieldguide_test_util::vocab::VocabEmbedder;

/// Bag-of-words embedder so retrieval can be exercised without the ONNX model.
pub struct FakeEmbedder(VocabEmbedder);

impl FakeEmbedder {
    pub fn new() -> Self {
        Self(VocabEmbedder::new())
    }
}

impl TextEmbedder for FakeEmbedder {
    fn embed_batch(&mut self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(self.0.embed(texts))
    }
}

/// Create a [`Runtime`] whose inference endpoints live under `base_url`.
///
/// The model cache directory is an empty tempdir, so loading the embedder
/// fails. The caller must hold the returned [`tempfile::TempDir`].
pub fn runtime_with_api(base_url: &str) -> (tempfile::TempDir, Runtime) {
    let tmp = tempfile::tempdir().unwrap();
    let runtime = Runtime {
        model_cache_dir: tmp.path().join("models"),
        api: Some(ApiConfig {
            api_key: "hf_test".to_string(),
            image_model_url: format!("{base_url}/models/image"),
            text_model_url: format!("{base_url}/models/text"),
        }),
    };
    (tmp, runtime)
}

/// Create a [`Runtime`] with no API key configured.
pub fn runtime_without_api() -> (tempfile::TempDir, Runtime) {
    let tmp = tempfile::tempdir().unwrap();
    let runtime = Runtime {
        model_cache_dir: tmp.path().join("models"),
        api: None,
    };
    (tmp, runtime)
}
