use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Adapts a single image, or a directory of images, to the [`FrameSource`]
/// interface.
///
/// Directory entries are sorted by file name and decoded lazily, one frame
/// at a time, as RGBA. Every frame must share the first frame's dimensions.
pub struct ImageSequenceReader {
    paths: Vec<PathBuf>,
    dimensions: Option<(u32, u32)>,
}

impl ImageSequenceReader {
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            dimensions: None,
        }
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn decode_frame(
    path: &Path,
    index: usize,
    (width, height): (u32, u32),
) -> Result<Frame, Box<dyn std::error::Error>> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to decode {}: {e}", path.display()))?
        .to_rgba8();
    if image.dimensions() != (width, height) {
        return Err(format!(
            "{} is {}x{}, expected {width}x{height}",
            path.display(),
            image.width(),
            image.height()
        )
        .into());
    }
    Ok(Frame::from_rgba_image(image, index))
}

impl FrameSource for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        let paths = if path.is_dir() {
            list_images(path)?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(format!("Input not found: {}", path.display()).into());
        };
        let first = paths
            .first()
            .ok_or_else(|| format!("No images found in {}", path.display()))?;

        let (width, height) = image::image_dimensions(first)
            .map_err(|e| format!("Failed to read {}: {e}", first.display()))?;
        log::debug!(
            "Opened {} frame(s) of {width}x{height} from {}",
            paths.len(),
            path.display()
        );

        let metadata = SourceMetadata {
            width,
            height,
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };
        self.paths = paths;
        self.dimensions = Some((width, height));
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(dimensions) = self.dimensions else {
            return Box::new(std::iter::once(Err(
                "ImageSequenceReader: not opened".into()
            )));
        };
        Box::new(
            self.paths
                .iter()
                .enumerate()
                .map(move |(index, path)| decode_frame(path, index, dimensions)),
        )
    }

    fn close(&mut self) {
        self.paths.clear();
        self.dimensions = None;
    }
}
