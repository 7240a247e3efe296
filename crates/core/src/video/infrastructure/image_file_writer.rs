use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::shared::frame::{Frame, GRAY_CHANNELS, RGBA_CHANNELS, RGB_CHANNELS};
use crate::video::domain::frame_sink::FrameSink;

/// Where annotated frames end up.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputTarget {
    /// Every frame is written to the same file; the last one wins.
    File(PathBuf),
    /// One `frame_NNNNNN.<extension>` file per frame index.
    Directory { dir: PathBuf, extension: String },
}

/// Writes annotated frames to image files using the `image` crate.
///
/// The encoder is picked from the file extension. Formats without an
/// alpha channel (JPEG) receive the RGB part of RGBA frames.
pub struct ImageFileWriter {
    target: OutputTarget,
}

impl ImageFileWriter {
    pub fn new(target: OutputTarget) -> Self {
        Self { target }
    }

    pub fn to_file(path: &Path) -> Self {
        Self::new(OutputTarget::File(path.to_path_buf()))
    }

    pub fn to_directory(dir: &Path) -> Self {
        Self::new(OutputTarget::Directory {
            dir: dir.to_path_buf(),
            extension: "png".into(),
        })
    }

    pub fn path_for(&self, frame: &Frame) -> PathBuf {
        match &self.target {
            OutputTarget::File(path) => path.clone(),
            OutputTarget::Directory { dir, extension } => {
                dir.join(format!("frame_{:06}.{extension}", frame.index()))
            }
        }
    }
}

fn to_image(frame: &Frame) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let (w, h, data) = (frame.width(), frame.height(), frame.data().to_vec());
    let image = match frame.channels() {
        RGBA_CHANNELS => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        RGB_CHANNELS => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        GRAY_CHANNELS => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        other => return Err(format!("Cannot encode a frame with {other} channels").into()),
    };
    image.ok_or_else(|| "Failed to create image from frame data".into())
}

fn lacks_alpha(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
}

impl FrameSink for ImageFileWriter {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.path_for(frame);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut image = to_image(frame)?;
        if lacks_alpha(&path) && image.color().has_alpha() {
            image = DynamicImage::ImageRgb8(image.to_rgb8());
        }
        image
            .save(&path)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        log::debug!("Wrote frame {} to {}", frame.index(), path.display());
        Ok(())
    }
}
