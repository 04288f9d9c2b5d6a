use crate::core::{ModelConfig, SentimentError};
use crate::models::BiLstmClassifier;
use anyhow::Context;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::ops::log_softmax;
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Padded sequences paired with one-hot targets.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledSequences {
    sequences: Vec<Vec<u32>>,
    targets: Vec<Vec<f32>>,
    seq_len: usize,
    num_classes: usize,
}

impl LabelledSequences {
    /// All sequences must share one length and all targets one width.
    pub fn new(sequences: Vec<Vec<u32>>, targets: Vec<Vec<f32>>) -> anyhow::Result<Self> {
        if sequences.len() != targets.len() {
            anyhow::bail!(
                "{} sequences but {} targets",
                sequences.len(),
                targets.len()
            );
        }
        let seq_len = sequences.first().map_or(0, Vec::len);
        let num_classes = targets.first().map_or(0, Vec::len);
        if sequences.iter().any(|s| s.len() != seq_len) {
            anyhow::bail!("sequences must be padded to a common length");
        }
        if targets.iter().any(|t| t.len() != num_classes) {
            anyhow::bail!("targets must share one width");
        }
        Ok(Self {
            sequences,
            targets,
            seq_len,
            num_classes,
        })
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            sequences: indices.iter().map(|&i| self.sequences[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i].clone()).collect(),
            seq_len: self.seq_len,
            num_classes: self.num_classes,
        }
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn sequences(&self) -> &[Vec<u32>] {
        &self.sequences
    }

    /// Arg-max class of every target row.
    pub fn labels(&self) -> Vec<usize> {
        self.targets.iter().map(|t| argmax(t)).collect()
    }

    fn batch(&self, indices: &[usize], device: &Device) -> candle_core::Result<(Tensor, Tensor)> {
        let rows = indices.iter().map(|&i| &self.sequences[i]);
        let ids = ids_tensor(rows, indices.len(), self.seq_len, device)?;
        let flat: Vec<f32> = indices
            .iter()
            .flat_map(|&i| self.targets[i].iter().copied())
            .collect();
        let targets = Tensor::from_vec(flat, (indices.len(), self.num_classes), device)?;
        Ok((ids, targets))
    }
}

fn argmax(row: &[f32]) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

fn ids_tensor<'a>(
    rows: impl Iterator<Item = &'a Vec<u32>>,
    batch: usize,
    seq_len: usize,
    device: &Device,
) -> candle_core::Result<Tensor> {
    let flat: Vec<u32> = rows.flat_map(|r| r.iter().copied()).collect();
    Tensor::from_vec(flat, (batch, seq_len), device)
}

/// Mean categorical cross-entropy between logits and one-hot targets.
pub fn categorical_cross_entropy(logits: &Tensor, targets: &Tensor) -> candle_core::Result<Tensor> {
    let log_probs = log_softmax(logits, D::Minus1)?;
    (targets * log_probs)?.sum(D::Minus1)?.neg()?.mean_all()
}

/// Per-epoch metrics, keyed like a Keras `History`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub loss: Vec<f64>,
    pub acc: Vec<f64>,
    pub val_loss: Vec<f64>,
    pub val_acc: Vec<f64>,
}

impl History {
    pub fn epochs(&self) -> usize {
        self.loss.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loss: f64,
    pub accuracy: f64,
}

pub struct Trainer {
    varmap: VarMap,
    model: BiLstmClassifier,
    optimizer: AdamW,
    device: Device,
    rng: StdRng,
    num_classes: usize,
}

impl Trainer {
    /// Fresh weights and an Adam optimizer (AdamW with no weight decay).
    pub fn new(
        config: &ModelConfig,
        vocab_size: usize,
        num_classes: usize,
        learning_rate: f64,
        seed: u64,
        device: Device,
    ) -> anyhow::Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = BiLstmClassifier::new(config, vocab_size, num_classes, vb)?;

        let params = ParamsAdamW {
            lr: learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-7,
            weight_decay: 0.0,
        };
        let optimizer = AdamW::new(varmap.all_vars(), params)?;

        Ok(Self {
            varmap,
            model,
            optimizer,
            device,
            rng: StdRng::seed_from_u64(seed),
            num_classes,
        })
    }

    pub fn model(&self) -> &BiLstmClassifier {
        &self.model
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn num_parameters(&self) -> usize {
        self.varmap.all_vars().iter().map(|v| v.elem_count()).sum()
    }

    /// Trains for `epochs` passes over `train`, reshuffling every epoch, and
    /// scores `validation` after each one.
    pub fn fit(
        &mut self,
        train: &LabelledSequences,
        validation: Option<&LabelledSequences>,
        epochs: usize,
        batch_size: usize,
    ) -> anyhow::Result<History> {
        if train.is_empty() {
            return Err(SentimentError::EmptyDataset.into());
        }
        if train.num_classes != self.num_classes {
            anyhow::bail!(
                "targets have {} classes, model has {}",
                train.num_classes,
                self.num_classes
            );
        }

        let mut history = History::default();
        for epoch in 1..=epochs {
            let (loss, acc) = self
                .train_epoch(train, batch_size)
                .with_context(|| format!("epoch {epoch} failed"))?;
            history.loss.push(loss);
            history.acc.push(acc);

            match validation {
                Some(val) if !val.is_empty() => {
                    let eval = self.evaluate(val, batch_size)?;
                    history.val_loss.push(eval.loss);
                    history.val_acc.push(eval.accuracy);
                    tracing::info!(
                        epoch,
                        epochs,
                        loss,
                        acc,
                        val_loss = eval.loss,
                        val_acc = eval.accuracy,
                        "epoch finished"
                    );
                }
                _ => tracing::info!(epoch, epochs, loss, acc, "epoch finished"),
            }
        }
        Ok(history)
    }

    fn train_epoch(
        &mut self,
        data: &LabelledSequences,
        batch_size: usize,
    ) -> anyhow::Result<(f64, f64)> {
        let mut order: Vec<usize> = (0..data.len()).collect();
        order.shuffle(&mut self.rng);

        let mut loss_sum = 0.0;
        let mut hits = 0usize;
        for (step, chunk) in order.chunks(batch_size.max(1)).enumerate() {
            let (ids, targets) = data.batch(chunk, &self.device)?;
            let logits = self.model.forward_t(&ids, true)?;
            let loss = categorical_cross_entropy(&logits, &targets)?;
            self.optimizer.backward_step(&loss)?;

            let batch_loss = loss.to_scalar::<f32>()? as f64;
            loss_sum += batch_loss * chunk.len() as f64;
            hits += count_hits(&logits, &targets)?;
            tracing::debug!(step, batch_loss, "batch");
        }

        let n = data.len() as f64;
        Ok((loss_sum / n, hits as f64 / n))
    }

    /// Loss and accuracy with dropout disabled.
    pub fn evaluate(
        &self,
        data: &LabelledSequences,
        batch_size: usize,
    ) -> anyhow::Result<Evaluation> {
        if data.is_empty() {
            return Err(SentimentError::EmptyDataset.into());
        }
        let order: Vec<usize> = (0..data.len()).collect();
        let mut loss_sum = 0.0;
        let mut hits = 0usize;
        for chunk in order.chunks(batch_size.max(1)) {
            let (ids, targets) = data.batch(chunk, &self.device)?;
            let logits = self.model.forward_t(&ids, false)?;
            let loss = categorical_cross_entropy(&logits, &targets)?.to_scalar::<f32>()? as f64;
            loss_sum += loss * chunk.len() as f64;
            hits += count_hits(&logits, &targets)?;
        }
        let n = data.len() as f64;
        Ok(Evaluation {
            loss: loss_sum / n,
            accuracy: hits as f64 / n,
        })
    }

    /// Class probabilities for padded sequences.
    pub fn predict_proba(
        &self,
        sequences: &[Vec<u32>],
        batch_size: usize,
    ) -> anyhow::Result<Vec<Vec<f32>>> {
        predict_proba(&self.model, sequences, batch_size, &self.device)
    }

    pub fn predict(&self, sequences: &[Vec<u32>], batch_size: usize) -> anyhow::Result<Vec<usize>> {
        let probs = self.predict_proba(sequences, batch_size)?;
        Ok(probs.iter().map(|p| argmax(p)).collect())
    }

    pub fn save_weights(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.varmap
            .save(path)
            .with_context(|| format!("Failed to save weights to {path:?}"))
    }
}

/// Batched softmax inference shared by the trainer and the inference pipeline.
pub fn predict_proba(
    model: &BiLstmClassifier,
    sequences: &[Vec<u32>],
    batch_size: usize,
    device: &Device,
) -> anyhow::Result<Vec<Vec<f32>>> {
    let mut out = Vec::with_capacity(sequences.len());
    for chunk in sequences.chunks(batch_size.max(1)) {
        let seq_len = chunk.first().map_or(0, Vec::len);
        if chunk.iter().any(|s| s.len() != seq_len) {
            anyhow::bail!("sequences must be padded to a common length");
        }
        let ids = ids_tensor(chunk.iter(), chunk.len(), seq_len, device)?;
        out.extend(model.predict_proba(&ids)?.to_vec2::<f32>()?);
    }
    Ok(out)
}

fn count_hits(logits: &Tensor, targets: &Tensor) -> candle_core::Result<usize> {
    let predicted = logits.argmax(D::Minus1)?.to_vec1::<u32>()?;
    let expected = targets.argmax(D::Minus1)?.to_vec1::<u32>()?;
    Ok(predicted.iter().zip(&expected).filter(|(p, e)| p == e).count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_model() -> ModelConfig {
        ModelConfig {
            embedding_dim: 8,
            hidden_size: 8,
            dropout: 0.0,
        }
    }

    /// Class 1 sequences are built from ids 2..5, class 0 from ids 6..9.
    fn separable(n: usize) -> anyhow::Result<LabelledSequences> {
        let mut sequences = Vec::new();
        let mut targets = Vec::new();
        for i in 0..n {
            let positive = i % 2 == 0;
            let base = if positive { 2 } else { 6 };
            sequences.push((0..6).map(|j| base + ((i + j) % 4) as u32).collect());
            targets.push(if positive { vec![0.0, 1.0] } else { vec![1.0, 0.0] });
        }
        LabelledSequences::new(sequences, targets)
    }

    #[test]
    fn rejects_ragged_input() {
        let ragged = LabelledSequences::new(vec![vec![1, 2], vec![1]], vec![vec![1.0], vec![0.0]]);
        assert!(ragged.is_err());
        let mismatched = LabelledSequences::new(vec![vec![1, 2]], vec![]);
        assert!(mismatched.is_err());
    }

    #[test]
    fn select_and_labels() -> anyhow::Result<()> {
        let data = separable(4)?;
        let picked = data.select(&[1, 0]);
        assert_eq!(picked.labels(), vec![0, 1]);
        assert_eq!(picked.seq_len(), 6);
        Ok(())
    }

    #[test]
    fn cross_entropy_of_confident_correct_logits_is_small() -> anyhow::Result<()> {
        let device = Device::Cpu;
        let logits = Tensor::new(&[[10f32, -10.0], [-10.0, 10.0]], &device)?;
        let targets = Tensor::new(&[[1f32, 0.0], [0.0, 1.0]], &device)?;
        let loss = categorical_cross_entropy(&logits, &targets)?.to_scalar::<f32>()?;
        assert!(loss < 1e-3);

        let uniform = Tensor::zeros((2, 2), DType::F32, &device)?;
        let loss = categorical_cross_entropy(&uniform, &targets)?.to_scalar::<f32>()?;
        assert!((loss - std::f32::consts::LN_2).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn training_reduces_loss_on_separable_data() -> anyhow::Result<()> {
        let data = separable(32)?;
        let mut trainer = Trainer::new(&tiny_model(), 10, 2, 1e-2, 42, Device::Cpu)?;
        let before = trainer.evaluate(&data, 8)?;
        let history = trainer.fit(&data, Some(&data), 15, 8)?;
        let after = trainer.evaluate(&data, 8)?;

        assert_eq!(history.epochs(), 15);
        assert_eq!(history.val_loss.len(), 15);
        assert!(after.loss < before.loss);
        assert!(trainer.num_parameters() > 0);

        let predictions = trainer.predict(data.sequences(), 8)?;
        assert_eq!(predictions.len(), data.len());
        Ok(())
    }

    #[test]
    fn empty_training_set_is_rejected() -> anyhow::Result<()> {
        let empty = LabelledSequences::new(vec![], vec![])?;
        let mut trainer = Trainer::new(&tiny_model(), 10, 2, 1e-3, 1, Device::Cpu)?;
        let err = trainer.fit(&empty, None, 1, 4).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SentimentError>(),
            Some(SentimentError::EmptyDataset)
        ));
        Ok(())
    }
}
