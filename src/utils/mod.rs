//! File helpers shared by the training and inference pipelines.

pub mod artifacts;

pub use artifacts::{load_json, save_json, ArtifactPaths};
