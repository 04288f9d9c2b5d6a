//! Mini-batch training and evaluation of the classifier.
//!
//! ## Main Types
//!
//! - [`Trainer`] - Owns the weights and the optimizer, runs epochs and batched inference
//! - [`LabelledSequences`] - Padded id sequences paired with one-hot targets
//! - [`History`] - Per-epoch loss and accuracy for training and validation
//! - [`ClassificationReport`] - Precision, recall and F1 per class

pub mod metrics;
pub mod trainer;

pub use metrics::{accuracy, ClassMetrics, ClassificationReport, ConfusionMatrix};
pub use trainer::{Evaluation, History, LabelledSequences, Trainer};
