use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::annotation::infrastructure::imageproc_annotator::{load_font, ImageprocAnnotator};
use crate::classification::domain::emotion_classifier::EmotionClassifier;
use crate::classification::infrastructure::onnx_emotion_classifier::OnnxEmotionClassifier;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;
use crate::pipeline::emotion_pipeline::EmotionPipeline;
use crate::shared::asset_resolver;
use crate::shared::config::{ConfigError, PipelineConfig};
use crate::shared::constants::{CASCADE_MODEL_NAME, EMOTION_MODEL_NAME};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to load {component}: {message}")]
    Load {
        component: &'static str,
        message: String,
    },
}

/// Builds an [`EmotionPipeline`] from configuration.
///
/// Invalid configuration is fatal. A cascade, model or font that cannot be
/// loaded is logged and left out, so the pipeline degrades to passthrough
/// (or to rectangles without labels), unless `strict` is set.
pub struct PipelineSession;

impl PipelineSession {
    pub fn load(config: &PipelineConfig) -> Result<EmotionPipeline, StartupError> {
        config.validate()?;

        let detector = optional(
            config.strict,
            "face cascade",
            cascade_path(config).and_then(|path| {
                CascadeFaceDetector::new(&path, config.detection.clone())
                    .map_err(|e| e.to_string())
            }),
        )?
        .map(|d| Box::new(d) as Box<dyn FaceDetector>);

        let classifier = optional(
            config.strict,
            "emotion model",
            model_path(config).and_then(|path| {
                OnnxEmotionClassifier::new(&path, config.input_size).map_err(|e| e.to_string())
            }),
        )?
        .map(|c| Box::new(c) as Box<dyn EmotionClassifier>);

        let font = match &config.font_path {
            Some(path) => optional(
                config.strict,
                "label font",
                load_font(path).map_err(|e| e.to_string()),
            )?,
            None => None,
        };
        let annotator = ImageprocAnnotator::new(config.annotation.clone(), font);

        let pipeline = EmotionPipeline::new(
            detector,
            classifier,
            Box::new(annotator),
            config.input_size,
        );
        if pipeline.is_passthrough() {
            log::warn!("Emotion pipeline running in passthrough mode");
        } else {
            log::info!("Emotion pipeline ready");
        }
        Ok(pipeline)
    }
}

/// Turns a load failure into an absent component, or into a fatal error
/// when running strict.
fn optional<T>(
    strict: bool,
    component: &'static str,
    loaded: Result<T, String>,
) -> Result<Option<T>, StartupError> {
    match loaded {
        Ok(value) => Ok(Some(value)),
        Err(message) if strict => Err(StartupError::Load { component, message }),
        Err(message) => {
            log::warn!("Failed to load {component}: {message}");
            Ok(None)
        }
    }
}

/// Explicit path, otherwise the bundled cascade staged into the cache.
fn cascade_path(config: &PipelineConfig) -> Result<PathBuf, String> {
    if let Some(path) = &config.cascade_path {
        return Ok(path.clone());
    }
    let assets = config
        .assets_dir
        .as_deref()
        .ok_or("no cascade_path or assets_dir configured")?;
    asset_resolver::stage(CASCADE_MODEL_NAME, assets).map_err(|e| e.to_string())
}

/// Explicit path, otherwise the model shipped in the assets directory.
fn model_path(config: &PipelineConfig) -> Result<PathBuf, String> {
    if let Some(path) = &config.model_path {
        return Ok(path.clone());
    }
    config
        .assets_dir
        .as_deref()
        .map(|dir: &Path| dir.join(EMOTION_MODEL_NAME))
        .ok_or_else(|| "no model_path or assets_dir configured".to_string())
}
