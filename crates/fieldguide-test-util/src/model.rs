use std::path::PathBuf;

/// Return the model cache directory for tests.
///
/// Checks `FIELDGUIDE_MODEL_DIR` first, falling back to `~/.fieldguide/models/`.
pub fn model_dir() -> PathBuf {
    std::env::var("FIELDGUIDE_MODEL_DIR").map_or_else(
        |_| {
            dirs::home_dir()
                .expect("home dir")
                .join(".fieldguide")
                .join("models")
        },
        PathBuf::from,
    )
}
