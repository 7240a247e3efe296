use std::collections::HashMap;
use std::path::Path;

use crate::classification::domain::emotion::Emotion;
use crate::pipeline::emotion_pipeline::EmotionPipeline;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

/// Totals for one run over a frame source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub faces: usize,
    pub skipped_faces: usize,
    /// Frames the source could not decode; they are not written.
    pub unreadable_frames: usize,
    pub emotions: HashMap<Emotion, usize>,
}

impl RunSummary {
    pub fn count(&self, emotion: Emotion) -> usize {
        self.emotions.get(&emotion).copied().unwrap_or(0)
    }
}

/// Sequential driver: source → (mirror) → emotion pipeline → sink.
///
/// Frames are handled one at a time in capture order.
pub struct AnnotateFramesUseCase {
    source: Box<dyn FrameSource>,
    sink: Box<dyn FrameSink>,
    pipeline: EmotionPipeline,
    logger: Box<dyn PipelineLogger>,
    mirror: bool,
}

impl AnnotateFramesUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        pipeline: EmotionPipeline,
        logger: Box<dyn PipelineLogger>,
        mirror: bool,
    ) -> Self {
        Self {
            source,
            sink,
            pipeline,
            logger,
            mirror,
        }
    }

    pub fn execute(&mut self, input_path: &Path) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let metadata = self.source.open(input_path)?;
        self.logger.info(&describe_source(&metadata, input_path));
        if self.pipeline.is_passthrough() {
            self.logger
                .info("Emotion recognition unavailable; frames pass through unannotated");
        }

        let mut summary = RunSummary::default();
        let result = self.run_frames(metadata.total_frames, &mut summary);
        self.source.close();
        result?;
        self.logger.summary();

        Ok(summary)
    }

    fn run_frames(
        &mut self,
        total: usize,
        summary: &mut RunSummary,
    ) -> Result<(), Box<dyn std::error::Error>> {
        for (i, frame) in self.source.frames().enumerate() {
            let mut frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping frame {i}: {e}");
                    summary.unreadable_frames += 1;
                    self.logger.progress(i + 1, total);
                    continue;
                }
            };
            if self.mirror {
                frame.flip_horizontal();
            }

            let report = self.pipeline.process(&mut frame, None);
            self.logger.timing("detect", report.detect_ms);
            self.logger.timing("classify", report.classify_ms);
            self.logger.timing("annotate", report.annotate_ms);
            self.logger.metric("faces", report.samples.len() as f64);

            self.sink.write(&frame)?;

            summary.frames += 1;
            summary.faces += report.samples.len();
            summary.skipped_faces += report.skipped;
            for sample in &report.samples {
                *summary.emotions.entry(sample.emotion).or_default() += 1;
            }
            self.logger.progress(i + 1, total);
        }
        Ok(())
    }
}

fn describe_source(metadata: &SourceMetadata, input_path: &Path) -> String {
    let kind = if metadata.is_sequence() {
        "sequence"
    } else {
        "image"
    };
    let path = metadata.source_path.as_deref().unwrap_or(input_path);
    format!(
        "Annotating {kind} of {} frame(s) at {}x{} from {}",
        metadata.total_frames,
        metadata.width,
        metadata.height,
        path.display()
    )
}
