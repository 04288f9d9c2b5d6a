//! Bidirectional LSTM sentiment classifier.
//!
//! ```text
//! ids (batch, seq)
//!   -> Embedding(vocab, embedding_dim)
//!   -> BiLSTM(hidden, every step)   -> Dropout
//!   -> BiLSTM(hidden, final state)  -> Dropout
//!   -> Linear(2 * hidden, classes)  -> logits (batch, classes)
//! ```

use super::components::{Bidirectional, Embedding, Linear};
use crate::core::ModelConfig;
use crate::preprocessing::{Padding, Truncating};
use candle_core::{Module, Result, Tensor, D};
use candle_nn::{ops::softmax, Dropout, VarBuilder};
use serde::{Deserialize, Serialize};

/// Everything needed to rebuild a trained classifier and feed it inputs
/// shaped like its training data. Stored as `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModelConfig {
    pub model: ModelConfig,
    pub vocab_size: usize,
    pub num_classes: usize,
    pub max_len: usize,
    pub padding: Padding,
    pub truncating: Truncating,
    pub oov_token: String,
}

#[derive(Debug, Clone)]
pub struct BiLstmClassifier {
    embedding: Embedding,
    encoder: Bidirectional,
    pooler: Bidirectional,
    dropout: Dropout,
    classifier: Linear,
    span: tracing::Span,
}

impl BiLstmClassifier {
    pub fn new(
        config: &ModelConfig,
        vocab_size: usize,
        num_classes: usize,
        vb: VarBuilder,
    ) -> Result<Self> {
        let embedding = Embedding::new(vocab_size, config.embedding_dim, vb.pp("embedding"))?;
        let encoder = Bidirectional::new(
            config.embedding_dim,
            config.hidden_size,
            true,
            vb.pp("encoder"),
        )?;
        let pooler = Bidirectional::new(
            encoder.output_dim(),
            config.hidden_size,
            false,
            vb.pp("pooler"),
        )?;
        let classifier = Linear::new(pooler.output_dim(), num_classes, vb.pp("classifier"))?;
        let span = tracing::span!(tracing::Level::TRACE, "bilstm-classifier");

        Ok(Self {
            embedding,
            encoder,
            pooler,
            dropout: Dropout::new(config.dropout),
            classifier,
            span,
        })
    }

    /// Logits of shape `(batch, num_classes)`. Dropout is only active when
    /// `train` is set.
    pub fn forward_t(&self, ids: &Tensor, train: bool) -> Result<Tensor> {
        let _enter = self.span.enter();
        let xs = self.embedding.forward(ids)?;
        let xs = self.encoder.forward(&xs)?;
        let xs = self.dropout.forward(&xs, train)?;
        let xs = self.pooler.forward(&xs)?;
        let xs = self.dropout.forward(&xs, train)?;
        self.classifier.forward(&xs)
    }

    /// Class probabilities of shape `(batch, num_classes)`.
    pub fn predict_proba(&self, ids: &Tensor) -> Result<Tensor> {
        softmax(&self.forward_t(ids, false)?, D::Minus1)
    }
}
