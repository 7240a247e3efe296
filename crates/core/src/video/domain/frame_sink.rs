use crate::shared::frame::Frame;

/// Receives annotated frames for display or storage.
pub trait FrameSink {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
