use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::classification::domain::emotion::Emotion;
use crate::classification::domain::emotion_classifier::EmotionClassifier;
use crate::classification::domain::input_tensor::InputTensor;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::{Frame, FrameError};
use crate::shared::region::FaceRegion;

/// One classified face: where it was, what the model said, and the label
/// that was drawn for it.
#[derive(Clone, Debug, PartialEq)]
pub struct EmotionSample {
    pub region: FaceRegion,
    pub score: f32,
    pub emotion: Emotion,
}

/// Outcome of processing one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Regions returned by the detector.
    pub detected: usize,
    /// One entry per rectangle drawn, in detector order.
    pub samples: Vec<EmotionSample>,
    /// Regions dropped because cropping, inference or drawing failed.
    pub skipped: usize,
    pub detect_ms: f64,
    pub classify_ms: f64,
    pub annotate_ms: f64,
}

/// Per-frame emotion recognition: detect → crop → resize → tensor →
/// infer → label → draw.
///
/// Owns its detector, classifier and annotator for the whole session.
/// When either model failed to load the pipeline is a passthrough and
/// frames come back untouched.
pub struct EmotionPipeline {
    detector: Option<Box<dyn FaceDetector>>,
    classifier: Option<Box<dyn EmotionClassifier>>,
    annotator: Box<dyn FrameAnnotator>,
    input_size: u32,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

impl EmotionPipeline {
    pub fn new(
        detector: Option<Box<dyn FaceDetector>>,
        classifier: Option<Box<dyn EmotionClassifier>>,
        annotator: Box<dyn FrameAnnotator>,
        input_size: u32,
    ) -> Self {
        Self {
            detector,
            classifier,
            annotator,
            input_size,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        self.detector.is_none() || self.classifier.is_none()
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Annotates `color` in place.
    ///
    /// `gray` is the grayscale counterpart used for detection; it is derived
    /// from `color` when absent. Every rectangle drawn has exactly one
    /// sample in the returned report.
    pub fn process(&mut self, color: &mut Frame, gray: Option<&Frame>) -> FrameReport {
        let mut report = FrameReport::default();
        let (Some(detector), Some(classifier)) = (self.detector.as_mut(), self.classifier.as_mut())
        else {
            return report;
        };
        if !color.is_color() {
            log::warn!("{}", FrameError::NotColor { index: color.index() });
            return report;
        }

        let derived;
        let gray = match gray {
            Some(gray) if !gray.same_dimensions(color) => {
                let err = FrameError::DimensionMismatch {
                    width: color.width(),
                    height: color.height(),
                    gray_width: gray.width(),
                    gray_height: gray.height(),
                };
                log::warn!("Frame {}: {err}", color.index());
                return report;
            }
            Some(gray) => gray,
            None => match color.to_grayscale() {
                Ok(frame) => {
                    derived = frame;
                    &derived
                }
                Err(e) => {
                    log::warn!("Frame {}: {e}", color.index());
                    return report;
                }
            },
        };

        let start = Instant::now();
        let regions = match detector.detect(gray) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("Frame {}: face detection failed: {e}", color.index());
                report.detect_ms = elapsed_ms(start);
                return report;
            }
        };
        report.detect_ms = elapsed_ms(start);
        report.detected = regions.len();

        for region in regions {
            let start = Instant::now();
            let classified = InputTensor::from_region(color, &region, self.input_size)
                .map_err(|e| e.to_string())
                .and_then(|tensor| classifier.classify(&tensor).map_err(|e| e.to_string()));
            report.classify_ms += elapsed_ms(start);

            let score = match classified {
                Ok(score) => score,
                Err(e) => {
                    log::warn!(
                        "Frame {}: skipping face at ({}, {}): {e}",
                        color.index(),
                        region.x,
                        region.y
                    );
                    report.skipped += 1;
                    continue;
                }
            };
            let emotion = Emotion::from_score(score);

            let start = Instant::now();
            let drawn = self.annotator.annotate(color, &region, emotion.label());
            report.annotate_ms += elapsed_ms(start);
            if let Err(e) = drawn {
                log::warn!("Frame {}: failed to annotate face: {e}", color.index());
                report.skipped += 1;
                continue;
            }

            log::debug!(
                "Frame {}: {}x{} face at ({}, {}) scored {score:.3} -> {emotion}",
                color.index(),
                region.width,
                region.height,
                region.x,
                region.y
            );
            report.samples.push(EmotionSample {
                region,
                score,
                emotion,
            });
        }
        report
    }

    /// Frame callback: takes a color frame and optional grayscale companion,
    /// returns the color frame to display.
    pub fn on_frame(&mut self, mut color: Frame, gray: Option<Frame>) -> Frame {
        self.process(&mut color, gray.as_ref());
        color
    }
}
