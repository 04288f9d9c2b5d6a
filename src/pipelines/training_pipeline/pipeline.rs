use crate::core::{SentimentError, TrainingConfig};
use crate::loaders::{CsvDatasetLoader, DatasetSummary, ReviewDataset};
use crate::models::TrainedModelConfig;
use crate::preprocessing::word_index::PAD_ID;
use crate::preprocessing::{
    clean_reviews, median_length, pad_sequences, train_test_split, OneHotEncoder, Padding,
    Truncating, WordIndex,
};
use crate::training::{
    ClassificationReport, ConfusionMatrix, Evaluation, History, LabelledSequences, Trainer,
};
use crate::utils::{save_json, ArtifactPaths};
use candle_core::Device;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything a training run learned about the data and the model.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub dataset: DatasetSummary,
    /// Distinct words in the cleaned corpus.
    pub distinct_words: usize,
    /// Embedding rows actually used (padding and OOV included).
    pub vocab_size: usize,
    pub max_len: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub num_parameters: usize,
    pub history: History,
    pub evaluation: Evaluation,
    pub confusion_matrix: ConfusionMatrix,
    pub classification_report: ClassificationReport,
    pub artifacts: Option<ArtifactPaths>,
}

#[derive(Serialize)]
struct StoredEvaluation<'a> {
    evaluation: &'a Evaluation,
    confusion_matrix: &'a ConfusionMatrix,
    classification_report: &'a ClassificationReport,
}

pub struct SentimentTrainingPipeline {
    pub(crate) csv_path: PathBuf,
    pub(crate) config: TrainingConfig,
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) device: Device,
}

impl SentimentTrainingPipeline {
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Loads the CSV and trains on it.
    pub fn run(&self) -> anyhow::Result<TrainingReport> {
        let dataset = CsvDatasetLoader::new(&self.csv_path)
            .columns(&self.config.text_column, &self.config.label_column)
            .load()?;
        self.run_on(dataset)
    }

    /// Trains on an already loaded dataset.
    pub fn run_on(&self, mut dataset: ReviewDataset) -> anyhow::Result<TrainingReport> {
        let config = &self.config;

        let summary = dataset.summary();
        tracing::info!(
            rows = summary.rows,
            duplicates = summary.duplicates,
            missing_text = summary.missing_text,
            missing_label = summary.missing_label,
            "dataset summary"
        );
        let dropped = dataset.drop_missing();
        if dropped > 0 {
            tracing::warn!(dropped, "dropped rows with missing text or label");
        }
        if dataset.is_empty() {
            return Err(SentimentError::EmptyDataset.into());
        }

        let cleaned = clean_reviews(&dataset.reviews);
        let word_index = WordIndex::fit(&cleaned, config.vocab_size, &config.oov_token)?;
        tracing::info!(
            distinct_words = word_index.len(),
            top = ?word_index.top(10),
            "fitted word index"
        );

        let sequences = word_index.texts_to_sequences(&cleaned);
        let max_len = config
            .max_len
            .unwrap_or_else(|| median_length(&sequences))
            .max(1);
        let padded = pad_sequences(&sequences, max_len, Padding::Post, Truncating::Post, PAD_ID);
        tracing::info!(max_len, "padded sequences");

        let encoder = OneHotEncoder::fit(&dataset.sentiments);
        if encoder.num_classes() < 2 {
            anyhow::bail!(
                "need at least two sentiment classes, found {:?}",
                encoder.categories()
            );
        }
        let targets = encoder.transform(&dataset.sentiments)?;

        let data = LabelledSequences::new(padded, targets)?;
        let (train_idx, test_idx) = train_test_split(data.len(), config.test_size, config.seed);
        let train = data.select(&train_idx);
        let test = data.select(&test_idx);
        tracing::info!(train = train.len(), test = test.len(), "split dataset");

        let vocab_size = word_index.effective_vocab_size();
        let mut trainer = Trainer::new(
            &config.model,
            vocab_size,
            encoder.num_classes(),
            config.learning_rate,
            config.seed,
            self.device.clone(),
        )?;
        let num_parameters = trainer.num_parameters();
        tracing::info!(num_parameters, vocab_size, "built classifier");

        let history = trainer.fit(&train, Some(&test), config.epochs, config.batch_size)?;

        let evaluation = trainer.evaluate(&test, config.batch_size)?;
        let predicted = trainer.predict(test.sequences(), config.batch_size)?;
        let expected = test.labels();
        let confusion_matrix = ConfusionMatrix::new(encoder.categories(), &expected, &predicted);
        let classification_report = ClassificationReport::from_confusion(&confusion_matrix);
        tracing::info!(
            loss = evaluation.loss,
            accuracy = evaluation.accuracy,
            "evaluated on test split"
        );

        let mut report = TrainingReport {
            dataset: summary,
            distinct_words: word_index.len(),
            vocab_size,
            max_len,
            train_size: train.len(),
            test_size: test.len(),
            num_parameters,
            history,
            evaluation,
            confusion_matrix,
            classification_report,
            artifacts: None,
        };

        if let Some(dir) = &self.output_dir {
            let trained = TrainedModelConfig {
                model: config.model.clone(),
                vocab_size,
                num_classes: encoder.num_classes(),
                max_len,
                padding: Padding::Post,
                truncating: Truncating::Post,
                oov_token: config.oov_token.clone(),
            };
            let paths = save_artifacts(dir, &trained, &word_index, &encoder, &trainer, &report)?;
            report.artifacts = Some(paths);
        }

        Ok(report)
    }
}

fn save_artifacts(
    dir: &Path,
    trained: &TrainedModelConfig,
    word_index: &WordIndex,
    encoder: &OneHotEncoder,
    trainer: &Trainer,
    report: &TrainingReport,
) -> anyhow::Result<ArtifactPaths> {
    let paths = ArtifactPaths::in_dir(dir);
    paths.create_dir()?;

    save_json(&paths.config, trained)?;
    word_index
        .to_tokenizer()?
        .save(&paths.tokenizer, true)
        .map_err(|e| SentimentError::Tokenizer(e.to_string()))?;
    word_index.save(&paths.word_index)?;
    encoder.save(&paths.label_encoder)?;
    trainer.save_weights(&paths.weights)?;
    save_json(&paths.history, &report.history)?;
    save_json(
        &paths.evaluation,
        &StoredEvaluation {
            evaluation: &report.evaluation,
            confusion_matrix: &report.confusion_matrix,
            classification_report: &report.classification_report,
        },
    )?;

    tracing::info!(dir = ?paths.dir, "saved model artifacts");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ModelConfig;
    use crate::pipelines::training_pipeline::SentimentTrainingPipelineBuilder;
    use crate::pipelines::utils::DeviceSelectable;

    fn tiny_config() -> TrainingConfig {
        TrainingConfig {
            epochs: 1,
            batch_size: 4,
            model: ModelConfig {
                embedding_dim: 4,
                hidden_size: 4,
                dropout: 0.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn zero_median_length_pads_to_one() -> anyhow::Result<()> {
        let mut dataset = ReviewDataset::default();
        for (review, sentiment) in [
            ("10/10", "positive"),
            ("<br />", "negative"),
            ("!!!", "positive"),
            ("42", "negative"),
            ("great film", "positive"),
            ("awful film", "negative"),
        ] {
            dataset.push(review, sentiment);
        }

        let pipeline = SentimentTrainingPipelineBuilder::new("unused.csv")
            .config(tiny_config())
            .cpu()
            .build()?;
        let report = pipeline.run_on(dataset)?;

        assert_eq!(report.max_len, 1);
        assert_eq!(report.dataset.rows, 6);
        assert_eq!(report.train_size + report.test_size, 6);
        assert!(report.artifacts.is_none());
        Ok(())
    }
}
