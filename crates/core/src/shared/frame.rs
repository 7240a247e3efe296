use image::{ImageBuffer, Rgb, Rgba};
use thiserror::Error;

use crate::shared::region::FaceRegion;

pub const GRAY_CHANNELS: u8 = 1;
pub const RGB_CHANNELS: u8 = 3;
pub const RGBA_CHANNELS: u8 = 4;

#[derive(Error, Debug, PartialEq)]
pub enum FrameError {
    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(u8),
    #[error("frame {index} has no color channels")]
    NotColor { index: usize },
    #[error("region {0:?} lies outside the frame")]
    RegionOutside(FaceRegion),
    #[error("frame data is {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("grayscale frame is {gray_width}x{gray_height}, color frame is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        gray_width: u32,
        gray_height: u32,
    },
}

/// A captured frame: contiguous pixel bytes in row-major order.
///
/// Color frames carry RGBA (camera capture) or RGB (decoded files) pixels;
/// the grayscale counterpart carries a single luma channel. Channel order is
/// always red first, regardless of what the upstream capture called it.
fn expected_len(width: u32, height: u32, channels: u8) -> usize {
    width as usize * height as usize * channels as usize
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    /// Wraps a pixel buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height * channels`. Use
    /// [`Frame::try_new`] for buffers from outside the crate.
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        assert_eq!(
            data.len(),
            expected_len(width, height, channels),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn try_new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        index: usize,
    ) -> Result<Self, FrameError> {
        let expected = expected_len(width, height, channels);
        if data.len() != expected {
            return Err(FrameError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::new(data, width, height, channels, index))
    }

    pub fn from_rgba_image(image: image::RgbaImage, index: usize) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, RGBA_CHANNELS, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_color(&self) -> bool {
        self.channels >= RGB_CHANNELS
    }

    pub fn same_dimensions(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Derives the single-channel luma frame using the `image` crate's
    /// grayscale conversion. A grayscale input is returned as a copy.
    pub fn to_grayscale(&self) -> Result<Frame, FrameError> {
        let luma = match self.channels {
            GRAY_CHANNELS => return Ok(self.clone()),
            RGB_CHANNELS => {
                let view = self.view::<Rgb<u8>>()?;
                image::imageops::grayscale(&view)
            }
            RGBA_CHANNELS => {
                let view = self.view::<Rgba<u8>>()?;
                image::imageops::grayscale(&view)
            }
            other => return Err(FrameError::UnsupportedChannels(other)),
        };
        Ok(Frame::new(
            luma.into_raw(),
            self.width,
            self.height,
            GRAY_CHANNELS,
            self.index,
        ))
    }

    /// Mirrors the frame around its vertical axis, in place.
    pub fn flip_horizontal(&mut self) {
        let row_len = self.width as usize * self.channels as usize;
        let channels = self.channels as usize;
        if row_len == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(row_len) {
            let (mut left, mut right) = (0, self.width as usize - 1);
            while left < right {
                for c in 0..channels {
                    row.swap(left * channels + c, right * channels + c);
                }
                left += 1;
                right -= 1;
            }
        }
    }

    /// Lends the pixels to `f` as an owned `ImageBuffer` and takes them back
    /// afterwards. `P` must match the frame's channel layout.
    pub fn with_image_mut<P, F>(&mut self, f: F) -> Result<(), FrameError>
    where
        P: image::Pixel<Subpixel = u8>,
        F: FnOnce(&mut ImageBuffer<P, Vec<u8>>),
    {
        if P::CHANNEL_COUNT != self.channels {
            return Err(FrameError::UnsupportedChannels(self.channels));
        }
        let data = std::mem::take(&mut self.data);
        let mut image = ImageBuffer::<P, Vec<u8>>::from_raw(self.width, self.height, data)
            .ok_or(FrameError::UnsupportedChannels(self.channels))?;
        f(&mut image);
        self.data = image.into_raw();
        Ok(())
    }

    fn view<P>(&self) -> Result<ImageBuffer<P, &[u8]>, FrameError>
    where
        P: image::Pixel<Subpixel = u8>,
    {
        ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
            .ok_or(FrameError::UnsupportedChannels(self.channels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_rgba(width: u32, height: u32, px: [u8; 4]) -> Frame {
        let data = px
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Frame::new(data, width, height, RGBA_CHANNELS, 0)
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 16]; // 2x2x4
        let frame = Frame::new(data.clone(), 2, 2, 4, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 4);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
        assert!(frame.is_color());
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics() {
        Frame::new(vec![0u8; 10], 2, 2, 4, 0);
    }

    #[test]
    fn test_try_new_rejects_short_buffer() {
        assert_eq!(
            Frame::try_new(vec![0u8; 10], 2, 2, 4, 0),
            Err(FrameError::LengthMismatch {
                expected: 16,
                actual: 10
            })
        );
    }

    #[test]
    fn test_try_new_accepts_exact_buffer() {
        let frame = Frame::try_new(vec![0u8; 12], 2, 2, 3, 1).unwrap();
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 1);
    }

    #[test]
    fn test_grayscale_keeps_dimensions_and_index() {
        let frame = Frame::new(vec![10u8; 6 * 4 * 4], 6, 4, 4, 7);
        let gray = frame.to_grayscale().unwrap();
        assert_eq!(gray.width(), 6);
        assert_eq!(gray.height(), 4);
        assert_eq!(gray.channels(), GRAY_CHANNELS);
        assert_eq!(gray.index(), 7);
        assert!(!gray.is_color());
    }

    #[test]
    fn test_grayscale_of_white_and_black() {
        let white = solid_rgba(3, 3, [255, 255, 255, 255]).to_grayscale().unwrap();
        assert!(white.data().iter().all(|&v| v == 255));
        let black = solid_rgba(3, 3, [0, 0, 0, 255]).to_grayscale().unwrap();
        assert!(black.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_grayscale_is_deterministic() {
        let frame = solid_rgba(4, 4, [200, 30, 90, 255]);
        assert_eq!(frame.to_grayscale(), frame.to_grayscale());
    }

    #[test]
    fn test_grayscale_of_rgb_matches_rgba() {
        let rgba = solid_rgba(2, 2, [12, 180, 40, 255]);
        let rgb = Frame::new([12u8, 180, 40].repeat(4), 2, 2, 3, 0);
        assert_eq!(
            rgba.to_grayscale().unwrap().data(),
            rgb.to_grayscale().unwrap().data()
        );
    }

    #[test]
    fn test_grayscale_of_gray_is_copy() {
        let gray = Frame::new(vec![1, 2, 3, 4], 2, 2, 1, 0);
        assert_eq!(gray.to_grayscale().unwrap(), gray);
    }

    #[test]
    fn test_grayscale_rejects_two_channels() {
        let frame = Frame::new(vec![0; 8], 2, 2, 2, 0);
        assert_eq!(
            frame.to_grayscale(),
            Err(FrameError::UnsupportedChannels(2))
        );
    }

    #[test]
    fn test_flip_horizontal_swaps_pixels() {
        // 3x1 RGB: red, green, blue
        let mut frame = Frame::new(vec![255, 0, 0, 0, 255, 0, 0, 0, 255], 3, 1, 3, 0);
        frame.flip_horizontal();
        assert_eq!(frame.data(), &[0, 0, 255, 0, 255, 0, 255, 0, 0]);
    }

    #[test]
    fn test_flip_horizontal_twice_is_identity() {
        let original = Frame::new((0..32).collect(), 4, 2, 4, 0);
        let mut frame = original.clone();
        frame.flip_horizontal();
        frame.flip_horizontal();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_with_image_mut_writes_back() {
        let mut frame = Frame::new(vec![0u8; 2 * 2 * 4], 2, 2, 4, 0);
        frame
            .with_image_mut::<Rgba<u8>, _>(|img| img.put_pixel(1, 0, Rgba([9, 8, 7, 6])))
            .unwrap();
        assert_eq!(&frame.data()[4..8], &[9, 8, 7, 6]);
    }

    #[test]
    fn test_with_image_mut_rejects_wrong_layout() {
        let mut frame = Frame::new(vec![5u8; 2 * 2 * 3], 2, 2, 3, 0);
        let result = frame.with_image_mut::<Rgba<u8>, _>(|_| {});
        assert_eq!(result, Err(FrameError::UnsupportedChannels(3)));
        assert_eq!(frame.data(), &[5u8; 12][..]);
    }

    #[test]
    fn test_from_rgba_image() {
        let img = image::RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let frame = Frame::from_rgba_image(img, 9);
        assert_eq!(frame.channels(), 4);
        assert_eq!(frame.index(), 9);
        assert_eq!(&frame.data()[..4], &[1, 2, 3, 4]);
    }
}
