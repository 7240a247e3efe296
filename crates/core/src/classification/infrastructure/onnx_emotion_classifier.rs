//! Emotion regression network run through ONNX Runtime via `ort`.
//!
//! The network takes one NHWC face tensor `[1, size, size, 3]` and emits a
//! single float that decodes to an emotion band.
use std::path::Path;

use crate::classification::domain::emotion_classifier::EmotionClassifier;
use crate::classification::domain::input_tensor::InputTensor;
use crate::shared::constants::INFERENCE_THREADS;

use super::execution_provider::preferred_execution_providers;

pub struct OnnxEmotionClassifier {
    session: ort::session::Session,
    input_size: u32,
}

impl OnnxEmotionClassifier {
    /// Load the model once; the session is reused for every face.
    ///
    /// When the model declares a static input resolution (NHWC `[N, H, W, C]`)
    /// it must agree with `input_size`.
    pub fn new(model_path: &Path, input_size: u32) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.is_file() {
            return Err(format!("Emotion model not found: {}", model_path.display()).into());
        }
        let session = ort::session::Session::builder()?
            .with_intra_threads(INFERENCE_THREADS)?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;

        let declared = session.inputs().first().and_then(|input| {
            if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                (shape.len() == 4 && shape[1] > 0).then(|| shape[1] as u32)
            } else {
                None
            }
        });
        if let Some(size) = declared {
            if size != input_size {
                return Err(format!(
                    "Model expects {size}x{size} input, configured input size is {input_size}"
                )
                .into());
            }
        }

        log::info!(
            "Loaded emotion model {} ({input_size}x{input_size} input)",
            model_path.display()
        );
        Ok(Self {
            session,
            input_size,
        })
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&mut self, input: &InputTensor) -> Result<f32, Box<dyn std::error::Error>> {
        let size = self.input_size as usize;
        if input.data().dim() != (size, size, 3) {
            return Err(format!(
                "Input tensor shape {:?} does not match model input {size}x{size}x3",
                input.data().shape()
            )
            .into());
        }

        let input_value = ort::value::Tensor::from_array(input.to_batched())?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Emotion model produced no outputs".into());
        }
        let scores = outputs[0].try_extract_array::<f32>()?;
        let score = scores
            .iter()
            .next()
            .copied()
            .ok_or("Emotion model produced an empty output tensor")?;
        Ok(score)
    }
}
