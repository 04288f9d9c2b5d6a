use anyhow::Result;
use review_sentiment::pipelines::sentiment_analysis_pipeline::*;
use tracing_subscriber::EnvFilter;

// Usage: cargo run --example predict_sentiment -- [model_dir] [text...]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let model_dir = args.next().unwrap_or_else(|| "models/imdb".to_string());
    let mut texts: Vec<String> = args.collect();
    if texts.is_empty() {
        texts = vec![
            "One of the best films I have seen this year. The cast is superb.".to_string(),
            "A tedious, badly written mess.<br /><br />Avoid it.".to_string(),
        ];
    }

    println!("Building pipeline...");
    let pipeline = SentimentAnalysisPipelineBuilder::from_dir(&model_dir).build()?;
    println!("Pipeline built successfully.");

    let results = pipeline.predict_batch(&texts)?;

    println!("\n=== Sentiment Analysis Results ===");
    for (text, result) in texts.iter().zip(results) {
        println!("Text: \"{}\"", text);
        println!("Sentiment: {} (confidence: {:.4})\n", result.label, result.score);
    }

    Ok(())
}
