pub mod core;
pub mod loaders;
pub mod models;
pub mod pipelines;
pub mod preprocessing;
pub mod training;
pub mod utils;

// Re-export core types
pub use core::{ModelConfig, SentimentError, TrainingConfig};

// Re-export the pipelines for easier access
pub use pipelines::sentiment_analysis_pipeline::{
    SentimentAnalysisPipeline, SentimentAnalysisPipelineBuilder, SentimentResult,
};
pub use pipelines::training_pipeline::{
    SentimentTrainingPipeline, SentimentTrainingPipelineBuilder, TrainingReport,
};
