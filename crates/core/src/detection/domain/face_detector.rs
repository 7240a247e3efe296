use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Domain interface for face detection on a grayscale frame.
///
/// Regions come back in engine order and are processed in that order.
/// `&mut self` lets engines reuse scratch state between frames. No `Send`
/// bound: detection runs on the thread that delivers frames.
pub trait FaceDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>>;
}
