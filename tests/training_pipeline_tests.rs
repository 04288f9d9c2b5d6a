// Integration tests for the training pipeline
// Trains a tiny classifier on CPU against a synthetic CSV

mod common;

use review_sentiment::pipelines::training_pipeline::*;
use review_sentiment::preprocessing::{OneHotEncoder, WordIndex};
use review_sentiment::training::History;
use review_sentiment::utils::load_json;
use review_sentiment::SentimentError;

#[test]
fn trains_and_reports_without_writing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv = common::write_reviews_csv(dir.path())?;

    let pipeline = SentimentTrainingPipelineBuilder::new(&csv)
        .config(common::tiny_config())
        .cpu()
        .build()?;
    let report = pipeline.run()?;

    assert_eq!(report.dataset.rows, 30);
    assert_eq!(report.dataset.duplicates, 0);
    assert_eq!(report.dataset.label_counts["positive"], 15);
    // ceil(30 * 0.3) reviews are held out
    assert_eq!(report.test_size, 9);
    assert_eq!(report.train_size, 21);
    assert!(report.max_len > 0);
    assert!(report.vocab_size <= 50);

    assert_eq!(report.history.epochs(), 2);
    assert_eq!(report.history.val_acc.len(), 2);
    assert!(report.history.loss.iter().all(|l| l.is_finite()));
    assert!((0.0..=1.0).contains(&report.evaluation.accuracy));

    assert_eq!(report.confusion_matrix.labels, ["negative", "positive"]);
    assert_eq!(report.confusion_matrix.total(), 9);
    assert_eq!(report.classification_report.classes.len(), 2);
    assert!(report.artifacts.is_none());
    assert!(!dir.path().join("config.json").exists());
    Ok(())
}

#[test]
fn writes_every_artifact() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv = common::write_reviews_csv(dir.path())?;
    let model_dir = dir.path().join("model");

    let report = SentimentTrainingPipelineBuilder::new(&csv)
        .config(common::tiny_config())
        .epochs(1)
        .output_dir(&model_dir)
        .cpu()
        .build()?
        .run()?;

    let paths = report
        .artifacts
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no artifacts reported"))?;
    for file in [
        &paths.config,
        &paths.tokenizer,
        &paths.word_index,
        &paths.label_encoder,
        &paths.weights,
        &paths.history,
        &paths.evaluation,
    ] {
        assert!(file.exists(), "{file:?} was not written");
    }

    let encoder = OneHotEncoder::load(&paths.label_encoder)?;
    assert_eq!(encoder.categories(), ["negative", "positive"]);
    let index = WordIndex::load(&paths.word_index)?;
    assert_eq!(index.len(), report.distinct_words);
    let history: History = load_json(&paths.history)?;
    assert_eq!(history.epochs(), 1);
    assert_eq!(history.val_loss.len(), 1);
    Ok(())
}

#[test]
fn single_class_data_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("one_class.csv");
    std::fs::write(
        &csv,
        "review,sentiment\ngreat film,positive\nloved it,positive\nbrilliant,positive\n",
    )?;

    let pipeline = SentimentTrainingPipelineBuilder::new(&csv)
        .config(common::tiny_config())
        .cpu()
        .build()?;
    assert!(pipeline.run().is_err());
    Ok(())
}

#[test]
fn missing_label_column_is_reported() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("no_labels.csv");
    std::fs::write(&csv, "review,score\ngreat film,5\nawful,1\n")?;

    let pipeline = SentimentTrainingPipelineBuilder::new(&csv)
        .config(common::tiny_config())
        .cpu()
        .build()?;
    let err = match pipeline.run() {
        Ok(_) => anyhow::bail!("training without a label column should fail"),
        Err(err) => err,
    };
    assert!(matches!(
        err.downcast_ref::<SentimentError>(),
        Some(SentimentError::MissingColumn(col)) if col == "sentiment"
    ));
    Ok(())
}
