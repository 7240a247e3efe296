use serde::{Deserialize, Serialize};

use crate::shared::constants::{LABEL_OFFSET_X, LABEL_OFFSET_Y};

/// How face rectangles and labels are drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationStyle {
    /// RGB stroke color of the face rectangle.
    pub box_color: [u8; 3],
    pub box_thickness: u32,
    /// RGB fill color of the label text.
    pub text_color: [u8; 3],
    /// Label glyph height in pixels.
    pub text_scale: f32,
    pub label_offset_x: i32,
    pub label_offset_y: i32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            box_color: [0, 255, 0],
            box_thickness: 3,
            text_color: [255, 0, 0],
            text_scale: 50.0,
            label_offset_x: LABEL_OFFSET_X,
            label_offset_y: LABEL_OFFSET_Y,
        }
    }
}

impl AnnotationStyle {
    pub fn validate(&self) -> Result<(), String> {
        if self.box_thickness == 0 {
            return Err("box_thickness must be at least 1".into());
        }
        if self.text_scale.is_nan() || self.text_scale <= 0.0 {
            return Err(format!("text_scale must be positive, got {}", self.text_scale));
        }
        Ok(())
    }
}
