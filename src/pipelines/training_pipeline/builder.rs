use super::pipeline::SentimentTrainingPipeline;
use crate::core::TrainingConfig;
use crate::pipelines::utils::{DeviceRequest, DeviceSelectable};
use std::path::PathBuf;

/// Builder for a [`SentimentTrainingPipeline`].
///
/// Start with the dataset path, then chain optional settings:
/// - `.config(TrainingConfig)`: replace all hyperparameters at once.
/// - `.epochs(n)`, `.batch_size(n)`, `.max_len(n)`, `.seed(n)`: common overrides.
/// - `.output_dir(path)`: where artifacts are written. Without it nothing is saved.
/// - `.cpu()` / `.cuda_device(i)` / `.device(d)`: where training runs.
pub struct SentimentTrainingPipelineBuilder {
    csv_path: PathBuf,
    config: TrainingConfig,
    output_dir: Option<PathBuf>,
    device_request: DeviceRequest,
}

impl SentimentTrainingPipelineBuilder {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            config: TrainingConfig::default(),
            output_dir: None,
            device_request: DeviceRequest::Default,
        }
    }

    pub fn config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.config.epochs = epochs;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.config.max_len = Some(max_len);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> anyhow::Result<SentimentTrainingPipeline> {
        self.config.validate()?;
        let device = self.device_request.resolve()?;
        Ok(SentimentTrainingPipeline {
            csv_path: self.csv_path,
            config: self.config,
            output_dir: self.output_dir,
            device,
        })
    }
}

impl DeviceSelectable for SentimentTrainingPipelineBuilder {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}
