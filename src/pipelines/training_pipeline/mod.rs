//! End-to-end training of the review sentiment classifier.
//!
//! Loads a labelled CSV, cleans and tokenizes the reviews, pads them to a
//! common length, one-hot encodes the labels, trains the bidirectional LSTM
//! on a seeded train split, evaluates it on the held-out split and writes the
//! tokenizer, label encoder and weights to a model directory.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use review_sentiment::pipelines::training_pipeline::*;
//!
//! let pipeline = SentimentTrainingPipelineBuilder::new("IMDB-Dataset.csv")
//!     .output_dir("models/imdb")
//!     .build()?;
//!
//! let report = pipeline.run()?;
//! println!("test accuracy: {:.4}", report.evaluation.accuracy);
//! println!("{}", report.classification_report);
//! # anyhow::Ok(())
//! ```

pub mod builder;
pub mod pipeline;

pub use builder::SentimentTrainingPipelineBuilder;
pub use pipeline::{SentimentTrainingPipeline, TrainingReport};

pub use crate::core::{ModelConfig, TrainingConfig};
pub use crate::pipelines::utils::DeviceSelectable;
