//! Sentiment analysis with a trained bidirectional LSTM classifier.
//!
//! This module restores a model directory written by the training pipeline
//! and classifies raw review text with it. Inputs go through the same
//! cleaning, word-level tokenization and padding as the training data.
//!
//! ## Main Types
//!
//! - [`SentimentAnalysisPipeline`] - Classifies review text
//! - [`SentimentAnalysisPipelineBuilder`] - Loads the artifacts and selects a device
//! - [`SentimentResult`] - Predicted label with its probability
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use review_sentiment::pipelines::sentiment_analysis_pipeline::*;
//!
//! let pipeline = SentimentAnalysisPipelineBuilder::from_dir("models/imdb")
//!     .cpu()
//!     .build()?;
//!
//! let result = pipeline.predict("One of the best films I have seen this year.")?;
//! println!("Sentiment: {} (confidence: {:.2})", result.label, result.score);
//! # anyhow::Ok(())
//! ```

pub mod builder;
pub mod pipeline;

pub use builder::SentimentAnalysisPipelineBuilder;
pub use pipeline::{SentimentAnalysisPipeline, SentimentResult};

pub use crate::pipelines::utils::DeviceSelectable;

pub use anyhow::Result;
