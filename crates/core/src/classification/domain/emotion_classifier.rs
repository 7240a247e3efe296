use crate::classification::domain::input_tensor::InputTensor;

/// Domain interface for emotion inference on one prepared face tensor.
///
/// Returns the network's raw scalar score; decoding into an
/// [`Emotion`](crate::classification::domain::emotion::Emotion) happens in
/// the pipeline.
pub trait EmotionClassifier {
    fn classify(&mut self, input: &InputTensor) -> Result<f32, Box<dyn std::error::Error>>;
}
