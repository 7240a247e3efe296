//! Classical cascade face detector backed by the `rustface` crate
//! (SeetaFace funnel-structured cascade).
//!
//! The cascade definition is loaded once at construction and the engine is
//! reused for every frame; only the minimum face size is refreshed per call
//! because it tracks the frame height.
use std::path::Path;

use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::{Frame, GRAY_CHANNELS};
use crate::shared::region::FaceRegion;

/// Smallest face size the SeetaFace engine accepts; it panics below this.
const ENGINE_MIN_FACE_SIZE: u32 = 20;

pub struct CascadeFaceDetector {
    engine: Box<dyn rustface::Detector>,
    params: DetectionParams,
}

impl CascadeFaceDetector {
    pub fn new(
        cascade_path: &Path,
        params: DetectionParams,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if !cascade_path.is_file() {
            return Err(format!("Cascade file not found: {}", cascade_path.display()).into());
        }
        let mut engine = rustface::create_detector(&cascade_path.to_string_lossy())?;
        engine.set_pyramid_scale_factor(pyramid_shrink(params.scale_factor));
        engine.set_score_thresh(params.score_threshold);
        engine.set_slide_window_step(params.window_step, params.window_step);

        log::info!(
            "Loaded cascade {} (scale_factor={}, min_neighbors={}, flags={})",
            cascade_path.display(),
            params.scale_factor,
            params.min_neighbors,
            params.flags
        );
        // The funnel cascade merges candidates itself; neighbour counts and
        // flags have no counterpart in this engine.
        log::debug!("min_neighbors and flags are not used by the SeetaFace engine");

        Ok(Self { engine, params })
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        if gray.channels() != GRAY_CHANNELS {
            return Err(format!(
                "Cascade detector expects a grayscale frame, got {} channels",
                gray.channels()
            )
            .into());
        }
        if gray.width() == 0 || gray.height() == 0 {
            return Ok(Vec::new());
        }

        let min_size = engine_min_face_size(&self.params, gray.height());
        if min_size > gray.width().min(gray.height()) {
            return Ok(Vec::new());
        }
        self.engine.set_min_face_size(min_size);

        let image = rustface::ImageData::new(gray.data(), gray.width(), gray.height());
        let faces = self.engine.detect(&image);

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRegion::new(bbox.x(), bbox.y(), bbox.width() as i32, bbox.height() as i32)
            })
            .collect())
    }
}

/// Converts an upward pyramid step (OpenCV convention, > 1.0) to the
/// engine's downscale ratio in (0, 1).
fn pyramid_shrink(scale_factor: f64) -> f32 {
    ((1.0 / scale_factor) as f32).clamp(0.01, 0.99)
}

fn engine_min_face_size(params: &DetectionParams, frame_height: u32) -> u32 {
    params.min_face_size(frame_height).max(ENGINE_MIN_FACE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_pyramid_shrink_inverts_scale_factor() {
        assert_relative_eq!(pyramid_shrink(1.1), 1.0 / 1.1, epsilon = 1e-6);
        assert_relative_eq!(pyramid_shrink(1.25), 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_pyramid_shrink_clamped_to_engine_range() {
        assert_relative_eq!(pyramid_shrink(1.0001), 0.99);
        assert_relative_eq!(pyramid_shrink(500.0), 0.01);
    }

    #[rstest]
    #[case(480, 48)]
    #[case(1080, 108)]
    #[case(120, 20)]
    #[case(10, 20)]
    fn test_engine_min_face_size(#[case] height: u32, #[case] expected: u32) {
        assert_eq!(
            engine_min_face_size(&DetectionParams::default(), height),
            expected
        );
    }

    #[test]
    fn test_missing_cascade_is_error() {
        let result = CascadeFaceDetector::new(
            Path::new("/nonexistent/cascade.bin"),
            DetectionParams::default(),
        );
        assert!(result.is_err());
    }
}
