use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Domain interface for drawing one face's result onto a frame.
///
/// Implementations modify the frame in place (`&mut Frame`).
pub trait FrameAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        region: &FaceRegion,
        label: &str,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
