pub mod bilstm;
pub mod components;

pub use bilstm::{BiLstmClassifier, TrainedModelConfig};
