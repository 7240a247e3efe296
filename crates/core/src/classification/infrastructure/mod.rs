pub mod execution_provider;
pub mod onnx_emotion_classifier;
