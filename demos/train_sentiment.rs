use anyhow::Result;
use review_sentiment::pipelines::training_pipeline::*;
use tracing_subscriber::EnvFilter;

// Usage: cargo run --example train_sentiment -- <reviews.csv> [model_dir] [config.json]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let csv_path = args.next().unwrap_or_else(|| "IMDB-Dataset.csv".to_string());
    let model_dir = args.next().unwrap_or_else(|| "models/imdb".to_string());
    let config = match args.next() {
        Some(path) => TrainingConfig::from_file(path)?,
        None => TrainingConfig::default(),
    };

    println!("Building pipeline...");
    let pipeline = SentimentTrainingPipelineBuilder::new(&csv_path)
        .config(config)
        .output_dir(&model_dir)
        .build()?;
    println!("Pipeline built successfully.");

    let report = pipeline.run()?;

    println!("\n=== Dataset ===");
    print!("{}", report.dataset);
    println!("vocabulary:    {} words", report.distinct_words);
    println!("padded length: {}", report.max_len);
    println!("train / test:  {} / {}", report.train_size, report.test_size);

    println!("\n=== Training History ===");
    for epoch in 0..report.history.epochs() {
        println!(
            "epoch {}: loss {:.4} acc {:.4} val_loss {:.4} val_acc {:.4}",
            epoch + 1,
            report.history.loss[epoch],
            report.history.acc[epoch],
            report.history.val_loss.get(epoch).copied().unwrap_or(f64::NAN),
            report.history.val_acc.get(epoch).copied().unwrap_or(f64::NAN),
        );
    }

    println!("\n=== Evaluation ===");
    println!("Test loss: {:.4}", report.evaluation.loss);
    println!("Test accuracy: {:.4}", report.evaluation.accuracy);
    println!("\nConfusion matrix:\n{}", report.confusion_matrix);
    println!("{}", report.classification_report);

    if let Some(paths) = &report.artifacts {
        println!("Model saved to {}", paths.dir.display());
    }

    Ok(())
}
