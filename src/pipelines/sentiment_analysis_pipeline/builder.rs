use super::pipeline::SentimentAnalysisPipeline;
use crate::core::SentimentError;
use crate::models::{BiLstmClassifier, TrainedModelConfig};
use crate::pipelines::utils::{DeviceRequest, DeviceSelectable};
use crate::preprocessing::OneHotEncoder;
use crate::utils::{load_json, ArtifactPaths};
use candle_core::DType;
use candle_nn::VarBuilder;
use std::path::PathBuf;
use tokenizers::Tokenizer;

/// Builder for a [`SentimentAnalysisPipeline`] backed by a model directory.
///
/// - `.cpu()` / `.cuda_device(i)` / `.device(d)`: select where inference runs.
/// - `.batch_size(n)`: how many reviews `predict_batch` feeds at once.
pub struct SentimentAnalysisPipelineBuilder {
    dir: PathBuf,
    device_request: DeviceRequest,
    batch_size: usize,
}

impl SentimentAnalysisPipelineBuilder {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            device_request: DeviceRequest::Default,
            batch_size: 32,
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn build(self) -> anyhow::Result<SentimentAnalysisPipeline> {
        let paths = ArtifactPaths::in_dir(&self.dir);
        for required in [
            &paths.config,
            &paths.tokenizer,
            &paths.label_encoder,
            &paths.weights,
        ] {
            if !required.exists() {
                let missing = required.display().to_string();
                return Err(SentimentError::MissingArtifact(missing).into());
            }
        }

        let device = self.device_request.resolve()?;
        let config: TrainedModelConfig = load_json(&paths.config)?;
        let tokenizer = Tokenizer::from_file(&paths.tokenizer).map_err(|e| {
            anyhow::anyhow!("Failed to load tokenizer {:?}: {}", paths.tokenizer, e)
        })?;
        let encoder = OneHotEncoder::load(&paths.label_encoder)?;
        if encoder.num_classes() != config.num_classes {
            anyhow::bail!(
                "label encoder has {} classes but the model was trained with {}",
                encoder.num_classes(),
                config.num_classes
            );
        }

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&paths.weights], DType::F32, &device)?
        };
        let model =
            BiLstmClassifier::new(&config.model, config.vocab_size, config.num_classes, vb)?;
        tracing::info!(
            dir = ?self.dir,
            device = ?device.location(),
            "loaded sentiment classifier"
        );

        Ok(SentimentAnalysisPipeline {
            model,
            tokenizer,
            encoder,
            config,
            device,
            batch_size: self.batch_size,
        })
    }
}

impl DeviceSelectable for SentimentAnalysisPipelineBuilder {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}
