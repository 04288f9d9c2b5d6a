pub mod config;
pub mod error;

pub use config::{ModelConfig, TrainingConfig};
pub use error::SentimentError;
