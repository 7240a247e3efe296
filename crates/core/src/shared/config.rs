use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotation::domain::annotation_style::AnnotationStyle;
use crate::detection::domain::detection_params::DetectionParams;
use crate::shared::constants::DEFAULT_INPUT_SIZE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything needed to build an emotion pipeline.
///
/// Every field has a default, so a JSON file only lists what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// ONNX emotion model.
    pub model_path: Option<PathBuf>,
    /// Cascade definition; when absent it is staged from `assets_dir`.
    pub cascade_path: Option<PathBuf>,
    /// Directory holding bundled assets.
    pub assets_dir: Option<PathBuf>,
    /// Label font (TTF/OTF).
    pub font_path: Option<PathBuf>,
    pub input_size: u32,
    /// Treat model/cascade/font load failures as fatal instead of degrading.
    pub strict: bool,
    /// Mirror every frame horizontally before processing.
    pub mirror: bool,
    pub detection: DetectionParams,
    pub annotation: AnnotationStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            cascade_path: None,
            assets_dir: None,
            font_path: None,
            input_size: DEFAULT_INPUT_SIZE,
            strict: false,
            mirror: false,
            detection: DetectionParams::default(),
            annotation: AnnotationStyle::default(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_size == 0 {
            return Err(ConfigError::Invalid("input_size must be at least 1".into()));
        }
        self.detection.validate().map_err(ConfigError::Invalid)?;
        self.annotation.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}
