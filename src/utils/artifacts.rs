//! On-disk layout of a trained classifier.
//!
//! A model directory holds everything needed to reproduce predictions:
//!
//! | file                 | content                                        |
//! |----------------------|------------------------------------------------|
//! | `config.json`        | [`TrainedModelConfig`](crate::models::TrainedModelConfig) |
//! | `tokenizer.json`     | word-level `tokenizers` tokenizer              |
//! | `word_index.json`    | full frequency-ranked word index               |
//! | `label_encoder.json` | one-hot label categories                       |
//! | `model.safetensors`  | classifier weights                             |
//! | `history.json`       | per-epoch loss and accuracy                    |
//! | `evaluation.json`    | test-split metrics                             |

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WORD_INDEX_FILE: &str = "word_index.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const HISTORY_FILE: &str = "history.json";
pub const EVALUATION_FILE: &str = "evaluation.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub word_index: PathBuf,
    pub label_encoder: PathBuf,
    pub weights: PathBuf,
    pub history: PathBuf,
    pub evaluation: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            dir: dir.to_path_buf(),
            config: dir.join(CONFIG_FILE),
            tokenizer: dir.join(TOKENIZER_FILE),
            word_index: dir.join(WORD_INDEX_FILE),
            label_encoder: dir.join(LABEL_ENCODER_FILE),
            weights: dir.join(WEIGHTS_FILE),
            history: dir.join(HISTORY_FILE),
            evaluation: dir.join(EVALUATION_FILE),
        }
    }

    pub fn create_dir(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create model directory {:?}", self.dir))
    }
}

/// Writes `value` as pretty JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {parent:?}"))?;
    }
    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {path:?}"))?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {path:?}"))
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {path:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn paths_live_in_the_model_directory() {
        let paths = ArtifactPaths::in_dir("models/imdb");
        assert_eq!(paths.weights, Path::new("models/imdb/model.safetensors"));
        assert_eq!(paths.tokenizer, Path::new("models/imdb/tokenizer.json"));
    }

    #[test]
    fn save_json_creates_missing_directories() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("value.json");
        let value = BTreeMap::from([("a".to_string(), 1u32)]);
        save_json(&path, &value)?;
        let loaded: BTreeMap<String, u32> = load_json(&path)?;
        assert_eq!(loaded, value);
        Ok(())
    }

    #[test]
    fn load_json_reports_the_path() {
        let err = load_json::<u32>("does/not/exist.json").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.json"));
    }
}
