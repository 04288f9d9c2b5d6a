//! Hyperparameters for the classifier and the training run.
//!
//! Defaults describe the IMDB setup: a 10k word vocabulary,
//! median-length padding, a 70/30 split seeded with 123 and five epochs of
//! Adam on a two-layer bidirectional LSTM.

use super::error::SentimentError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shape of the bidirectional LSTM classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub embedding_dim: usize,
    /// Units per direction; each bidirectional layer emits `2 * hidden_size`.
    pub hidden_size: usize,
    pub dropout: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 128,
            hidden_size: 128,
            dropout: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Only the `vocab_size - 1` most frequent indices are kept (index 0 pads).
    pub vocab_size: usize,
    pub oov_token: String,
    /// Fixed sequence length. `None` pads to the median review length.
    pub max_len: Option<usize>,
    pub test_size: f64,
    pub seed: u64,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub text_column: String,
    pub label_column: String,
    pub model: ModelConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_size: 10_000,
            oov_token: "<OOV>".to_string(),
            max_len: None,
            test_size: 0.3,
            seed: 123,
            epochs: 5,
            batch_size: 32,
            learning_rate: 1e-3,
            text_column: "review".to_string(),
            label_column: "sentiment".to_string(),
            model: ModelConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Reads a JSON config; absent fields fall back to the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path:?}"))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SentimentError> {
        let invalid = |msg: &str| Err(SentimentError::InvalidConfig(msg.to_string()));

        // 0 = padding, 1 = OOV, so anything below 3 leaves no room for words.
        if self.vocab_size < 3 {
            return invalid("vocab_size must be at least 3");
        }
        if self.oov_token.trim().is_empty() {
            return invalid("oov_token must not be blank");
        }
        if self.max_len == Some(0) {
            return invalid("max_len must be positive");
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return invalid("test_size must be in (0, 1)");
        }
        if self.epochs == 0 {
            return invalid("epochs must be positive");
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be positive");
        }
        if self.learning_rate <= 0.0 {
            return invalid("learning_rate must be positive");
        }
        if self.model.embedding_dim == 0 || self.model.hidden_size == 0 {
            return invalid("model dimensions must be positive");
        }
        if !(0.0..1.0).contains(&self.model.dropout) {
            return invalid("dropout must be in [0, 1)");
        }
        Ok(())
    }
}
