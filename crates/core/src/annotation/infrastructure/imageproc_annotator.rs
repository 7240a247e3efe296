use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Pixel, Rgb, Rgba};
use imageproc::definitions::Clamp;
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, Canvas};
use imageproc::rect::Rect;

use crate::annotation::domain::annotation_style::AnnotationStyle;
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::frame::{Frame, RGBA_CHANNELS, RGB_CHANNELS};
use crate::shared::region::FaceRegion;

/// Draws face rectangles and emotion labels with `imageproc`.
///
/// Without a font only rectangles are drawn.
pub struct ImageprocAnnotator {
    style: AnnotationStyle,
    font: Option<FontVec>,
}

impl ImageprocAnnotator {
    pub fn new(style: AnnotationStyle, font: Option<FontVec>) -> Self {
        if font.is_none() {
            log::warn!("No label font available; only face rectangles will be drawn");
        }
        Self { style, font }
    }

    fn draw<C>(
        &self,
        canvas: &mut C,
        box_color: C::Pixel,
        text_color: C::Pixel,
        region: &FaceRegion,
        label: &str,
    ) where
        C: Canvas,
        <C::Pixel as Pixel>::Subpixel: Into<f32> + Clamp<f32>,
    {
        for inset in 0..self.style.box_thickness as i32 {
            let w = region.width - 2 * inset;
            let h = region.height - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(region.x + inset, region.y + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(canvas, rect, box_color);
        }

        if let Some(font) = &self.font {
            let scale = PxScale::from(self.style.text_scale);
            let (x, baseline) =
                region.label_anchor(self.style.label_offset_x, self.style.label_offset_y);
            // draw_text_mut positions the top of the line box, not the baseline.
            let top = baseline - font.as_scaled(scale).ascent().round() as i32;
            draw_text_mut(canvas, text_color, x, top, scale, font, label);
        }
    }
}

impl Default for ImageprocAnnotator {
    fn default() -> Self {
        Self::new(AnnotationStyle::default(), None)
    }
}

impl FrameAnnotator for ImageprocAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        region: &FaceRegion,
        label: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if region.is_empty() {
            return Ok(());
        }
        let [br, bg, bb] = self.style.box_color;
        let [tr, tg, tb] = self.style.text_color;

        match frame.channels() {
            RGBA_CHANNELS => frame.with_image_mut::<Rgba<u8>, _>(|canvas| {
                self.draw(
                    canvas,
                    Rgba([br, bg, bb, 255]),
                    Rgba([tr, tg, tb, 255]),
                    region,
                    label,
                )
            })?,
            RGB_CHANNELS => frame.with_image_mut::<Rgb<u8>, _>(|canvas| {
                self.draw(canvas, Rgb([br, bg, bb]), Rgb([tr, tg, tb]), region, label)
            })?,
            other => {
                return Err(format!("Cannot annotate a frame with {other} channels").into());
            }
        }
        Ok(())
    }
}

/// Loads a TrueType/OpenType font for label rendering.
pub fn load_font(path: &Path) -> Result<FontVec, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read font {}: {e}", path.display()))?;
    let font = FontVec::try_from_vec(bytes)
        .map_err(|e| format!("Invalid font {}: {e}", path.display()))?;
    Ok(font)
}
