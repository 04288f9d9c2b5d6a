use thiserror::Error;

/// Failures raised while preparing data or restoring a trained classifier.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// The CSV header does not contain the requested column.
    #[error("column `{0}` not found in dataset header")]
    MissingColumn(String),

    /// Nothing left to train on after loading and filtering.
    #[error("dataset is empty")]
    EmptyDataset,

    /// A label was not seen when the encoder was fitted.
    #[error("unknown label `{0}`")]
    UnknownLabel(String),

    /// The cleaned corpus did not contain a single word.
    #[error("cannot fit a vocabulary on documents without words")]
    EmptyVocabulary,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Building, encoding with or saving the word-level tokenizer failed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// A file expected in the model directory does not exist.
    #[error("missing artifact: {0}")]
    MissingArtifact(String),
}
