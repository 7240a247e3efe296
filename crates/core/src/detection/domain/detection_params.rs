use serde::{Deserialize, Serialize};

/// Multi-scale cascade detection parameters.
///
/// Expressed in the usual cascade-detector vocabulary; adapters translate
/// them to whatever their engine understands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Minimum face side as a fraction of the frame height.
    pub min_size_ratio: f64,
    /// Image pyramid step between scales (> 1.0).
    pub scale_factor: f64,
    /// Neighbouring hits required to keep a candidate.
    pub min_neighbors: u32,
    /// Engine-specific performance hint, passed through untouched.
    pub flags: i32,
    /// Candidate score cut-off.
    pub score_threshold: f64,
    /// Sliding-window stride in pixels.
    pub window_step: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            min_size_ratio: 0.1,
            scale_factor: 1.1,
            min_neighbors: 2,
            flags: 2,
            score_threshold: 2.0,
            window_step: 4,
        }
    }
}

impl DetectionParams {
    /// Smallest face side (both width and height) worth searching for.
    pub fn min_face_size(&self, frame_height: u32) -> u32 {
        (frame_height as f64 * self.min_size_ratio) as u32
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_size_ratio.is_nan() || self.min_size_ratio <= 0.0 || self.min_size_ratio > 1.0 {
            return Err(format!(
                "min_size_ratio must be in (0, 1], got {}",
                self.min_size_ratio
            ));
        }
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(format!(
                "scale_factor must be greater than 1.0, got {}",
                self.scale_factor
            ));
        }
        if self.window_step == 0 {
            return Err("window_step must be at least 1".into());
        }
        Ok(())
    }
}
