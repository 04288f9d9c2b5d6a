// Pipeline modules organized by functionality
pub mod sentiment_analysis_pipeline;
pub mod training_pipeline;
pub mod utils;
