use std::time::Instant;

/// Observer for frame-level progress and per-stage timing.
///
/// Keeps use cases independent of where the numbers end up (log output,
/// a UI, or nowhere).
pub trait PipelineLogger {
    /// Report frame-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage (`detect`, `classify`, `annotate`)
    /// took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-frame metric such as the number of faces.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events. Used by tests and embedders with their own
/// progress reporting.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunningStat {
    pub count: usize,
    pub total: f64,
    pub max: f64,
}

impl RunningStat {
    fn record(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.max = self.max.max(value);
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Forwards events to the `log` crate and keeps running statistics for an
/// end-of-run summary.
///
/// Progress lines are throttled to every `throttle_frames` frames. Stages
/// and metrics are reported in the order they were first seen.
pub struct LogPipelineLogger {
    throttle_frames: usize,
    stages: Vec<(String, RunningStat)>,
    metrics: Vec<(String, RunningStat)>,
    start_time: Instant,
    frames_seen: usize,
}

fn entry<'a>(stats: &'a mut Vec<(String, RunningStat)>, name: &str) -> &'a mut RunningStat {
    let pos = match stats.iter().position(|(n, _)| n == name) {
        Some(pos) => pos,
        None => {
            stats.push((name.to_string(), RunningStat::default()));
            stats.len() - 1
        }
    };
    &mut stats[pos].1
}

impl LogPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            stages: Vec::new(),
            metrics: Vec::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    pub fn stage(&self, name: &str) -> Option<&RunningStat> {
        self.stages.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn metric_stat(&self, name: &str) -> Option<&RunningStat> {
        self.metrics.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Run summary ({} frames, {elapsed_s:.1}s):",
            self.frames_seen
        )];

        for (name, stat) in &self.stages {
            lines.push(format!(
                "  {name:10}: avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                stat.mean(),
                stat.max,
                stat.total
            ));
        }
        for (name, stat) in &self.metrics {
            lines.push(format!(
                "  {name}: avg {:.1}  max {:.0}  total {:.0}",
                stat.mean(),
                stat.max,
                stat.total
            ));
        }
        if self.frames_seen > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.frames_seen as f64 / elapsed_s
            ));
        }
        Some(lines.join("\n"))
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = current;
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Annotated {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        entry(&mut self.stages, stage).record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        entry(&mut self.metrics, name).record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("detect", 5.0);
        logger.metric("faces", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_accumulates() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("classify", 5.0);

        let detect = logger.stage("detect").unwrap();
        assert_eq!(detect.count, 2);
        assert_relative_eq!(detect.mean(), 25.0);
        assert_relative_eq!(detect.max, 30.0);
        assert_eq!(logger.stage("classify").unwrap().count, 1);
        assert!(logger.stage("annotate").is_none());
    }

    #[test]
    fn test_metric_accumulates() {
        let mut logger = LogPipelineLogger::new(10);
        logger.metric("faces", 1.0);
        logger.metric("faces", 2.0);
        logger.metric("faces", 0.0);

        let faces = logger.metric_stat("faces").unwrap();
        assert_relative_eq!(faces.total, 3.0);
        assert_relative_eq!(faces.mean(), 1.0);
    }

    #[test]
    fn test_summary_keeps_first_seen_order() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(2, 2);
        logger.timing("detect", 10.0);
        logger.timing("classify", 4.0);
        logger.timing("annotate", 1.0);
        logger.metric("faces", 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Run summary (2 frames"));
        let detect = summary.find("detect").unwrap();
        let classify = summary.find("classify").unwrap();
        let annotate = summary.find("annotate").unwrap();
        assert!(detect < classify && classify < annotate);
        assert!(summary.contains("faces: avg 2.0"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_frames_seen() {
        let mut logger = LogPipelineLogger::new(3);
        for i in 1..=7 {
            logger.progress(i, 7);
        }
        assert_eq!(logger.frames_seen, 7);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        assert_eq!(LogPipelineLogger::new(0).throttle_frames, 1);
    }

    #[test]
    fn test_running_stat_mean_of_nothing() {
        assert_relative_eq!(RunningStat::default().mean(), 0.0);
    }
}
