use crate::models::{BiLstmClassifier, TrainedModelConfig};
use crate::preprocessing::sequence::pad_sequence;
use crate::preprocessing::word_index::{encode_words, PAD_ID};
use crate::preprocessing::{clean_review, OneHotEncoder};
use crate::training::trainer::predict_proba;
use serde::Serialize;
use tokenizers::Tokenizer;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: String,
    pub score: f32,
}

pub struct SentimentAnalysisPipeline {
    pub(crate) model: BiLstmClassifier,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) encoder: OneHotEncoder,
    pub(crate) config: TrainedModelConfig,
    pub(crate) device: candle_core::Device,
    pub(crate) batch_size: usize,
}

impl SentimentAnalysisPipeline {
    /// Predict sentiment with structured result containing label and confidence score
    pub fn predict(&self, text: &str) -> anyhow::Result<SentimentResult> {
        let mut results = self.predict_batch(&[text])?;
        results
            .pop()
            .ok_or_else(|| anyhow::anyhow!("classifier returned no prediction"))
    }

    pub fn predict_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> anyhow::Result<Vec<SentimentResult>> {
        let sequences = texts
            .iter()
            .map(|t| self.encode(t.as_ref()))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let probabilities =
            predict_proba(&self.model, &sequences, self.batch_size, &self.device)?;

        probabilities
            .into_iter()
            .map(|probs| {
                let (index, score) = probs.iter().copied().enumerate().fold(
                    (0, f32::NEG_INFINITY),
                    |best, (i, p)| if p > best.1 { (i, p) } else { best },
                );
                let label = self
                    .encoder
                    .inverse(index)
                    .ok_or_else(|| anyhow::anyhow!("Predicted class {index} has no label"))?;
                Ok(SentimentResult {
                    label: label.to_string(),
                    score,
                })
            })
            .collect()
    }

    /// Cleans, tokenizes and pads `text` the way the training data was.
    pub fn encode(&self, text: &str) -> anyhow::Result<Vec<u32>> {
        let ids = encode_words(&self.tokenizer, &clean_review(text))?;
        Ok(pad_sequence(
            &ids,
            self.config.max_len,
            self.config.padding,
            self.config.truncating,
            PAD_ID,
        ))
    }

    pub fn labels(&self) -> &[String] {
        self.encoder.categories()
    }

    pub fn config(&self) -> &TrainedModelConfig {
        &self.config
    }

    pub fn device(&self) -> &candle_core::Device {
        &self.device
    }
}
