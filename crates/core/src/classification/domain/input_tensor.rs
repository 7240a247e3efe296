use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use ndarray::{Array3, Array4, Axis};

use crate::shared::frame::{Frame, FrameError};
use crate::shared::region::FaceRegion;

/// Classifier input: a `size x size x 3` array of R, G, B values in [0, 1],
/// laid out `[row][col][channel]`.
///
/// Channel order is always red, green, blue taken from the color frame's
/// first three channels, which is what the trained network expects.
#[derive(Clone, Debug, PartialEq)]
pub struct InputTensor {
    data: Array3<f32>,
}

impl InputTensor {
    /// Crops `region` out of a color frame, resizes it to `size x size`
    /// with nearest-neighbour sampling, and normalises it.
    ///
    /// The region is clamped to the frame first; a region with nothing
    /// inside the frame is an error.
    pub fn from_region(frame: &Frame, region: &FaceRegion, size: u32) -> Result<Self, FrameError> {
        if !frame.is_color() {
            return Err(FrameError::NotColor {
                index: frame.index(),
            });
        }
        let roi = region
            .clamp_to(frame.width(), frame.height())
            .ok_or(FrameError::RegionOutside(*region))?;

        let crop = crop_rgb(frame, &roi);
        let resized = image::imageops::resize(&crop, size, size, FilterType::Nearest);
        Ok(Self::from_rgb_image(&resized))
    }

    /// Normalises an already-sized RGB image.
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let data = Array3::from_shape_fn(
            (height as usize, width as usize, 3),
            |(row, col, channel)| {
                image.get_pixel(col as u32, row as u32)[channel] as f32 / 255.0
            },
        );
        Self { data }
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// NHWC with a leading batch axis of 1: `[1, size, size, 3]`.
    pub fn to_batched(&self) -> Array4<f32> {
        self.data.clone().insert_axis(Axis(0))
    }
}

/// Copies the ROI out of the frame, keeping only R, G and B.
fn crop_rgb(frame: &Frame, roi: &FaceRegion) -> RgbImage {
    let channels = frame.channels() as usize;
    let fw = frame.width() as usize;
    let (rx, ry) = (roi.x as usize, roi.y as usize);
    let data = frame.data();

    RgbImage::from_fn(roi.width as u32, roi.height as u32, |x, y| {
        let offset = ((ry + y as usize) * fw + rx + x as usize) * channels;
        Rgb([data[offset], data[offset + 1], data[offset + 2]])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn solid_frame(width: u32, height: u32, px: [u8; 4]) -> Frame {
        Frame::new(
            px.repeat((width * height) as usize),
            width,
            height,
            4,
            0,
        )
    }

    #[test]
    fn test_solid_red_crop_is_one_zero_zero() {
        let frame = solid_frame(100, 100, [255, 0, 0, 255]);
        let tensor = InputTensor::from_region(&frame, &FaceRegion::new(10, 10, 60, 40), 48).unwrap();

        assert_eq!(tensor.data().shape(), &[48, 48, 3]);
        for px in tensor.data().lanes(Axis(2)) {
            assert_relative_eq!(px[0], 1.0);
            assert_relative_eq!(px[1], 0.0);
            assert_relative_eq!(px[2], 0.0);
        }
    }

    #[test]
    fn test_channel_order_is_rgb() {
        let frame = solid_frame(10, 10, [10, 20, 30, 255]);
        let tensor = InputTensor::from_region(&frame, &FaceRegion::new(0, 0, 10, 10), 4).unwrap();
        let d = tensor.data();
        assert_relative_eq!(d[[2, 3, 0]], 10.0 / 255.0);
        assert_relative_eq!(d[[2, 3, 1]], 20.0 / 255.0);
        assert_relative_eq!(d[[2, 3, 2]], 30.0 / 255.0);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let opaque = solid_frame(8, 8, [90, 90, 90, 255]);
        let clear = solid_frame(8, 8, [90, 90, 90, 0]);
        let region = FaceRegion::new(0, 0, 8, 8);
        assert_eq!(
            InputTensor::from_region(&opaque, &region, 8).unwrap(),
            InputTensor::from_region(&clear, &region, 8).unwrap()
        );
    }

    #[test]
    fn test_rgb_frame_supported() {
        let frame = Frame::new([0u8, 255, 0].repeat(25), 5, 5, 3, 0);
        let tensor = InputTensor::from_region(&frame, &FaceRegion::new(1, 1, 3, 3), 6).unwrap();
        assert!(tensor.data().iter().step_by(3).all(|&v| v == 0.0));
        assert_relative_eq!(tensor.data()[[0, 0, 1]], 1.0);
    }

    #[rstest]
    #[case::degenerate(1, 1)]
    #[case::tall(3, 90)]
    #[case::wide(90, 3)]
    #[case::larger_than_input(100, 100)]
    #[case::exact(48, 48)]
    fn test_output_size_independent_of_crop(#[case] w: i32, #[case] h: i32) {
        let frame = solid_frame(100, 100, [1, 2, 3, 255]);
        let tensor = InputTensor::from_region(&frame, &FaceRegion::new(0, 0, w, h), 48).unwrap();
        assert_eq!(tensor.len(), 48 * 48 * 3);
        assert_eq!(tensor.data().shape(), &[48, 48, 3]);
    }

    #[test]
    fn test_nearest_sampling_keeps_sharp_edges() {
        // 2x1 crop: black | white → 4x4 must contain only 0.0 and 1.0
        let mut data = vec![0u8, 0, 0, 255, 255, 255, 255, 255];
        data.extend_from_slice(&[0, 0, 0, 255, 255, 255, 255, 255]);
        let frame = Frame::new(data, 2, 2, 4, 0);
        let tensor = InputTensor::from_region(&frame, &FaceRegion::new(0, 0, 2, 1), 4).unwrap();
        assert!(tensor.data().iter().all(|&v| v == 0.0 || v == 1.0));
        assert_relative_eq!(tensor.data()[[0, 0, 0]], 0.0);
        assert_relative_eq!(tensor.data()[[0, 3, 0]], 1.0);
    }

    #[test]
    fn test_region_partly_outside_is_clamped() {
        let frame = solid_frame(20, 20, [255, 255, 255, 255]);
        let tensor = InputTensor::from_region(&frame, &FaceRegion::new(-5, 15, 10, 10), 8).unwrap();
        assert!(tensor.data().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_region_fully_outside_is_error() {
        let frame = solid_frame(20, 20, [0, 0, 0, 255]);
        let region = FaceRegion::new(50, 50, 10, 10);
        assert_eq!(
            InputTensor::from_region(&frame, &region, 8),
            Err(FrameError::RegionOutside(region))
        );
    }

    #[test]
    fn test_grayscale_frame_is_error() {
        let frame = Frame::new(vec![0; 16], 4, 4, 1, 3);
        let result = InputTensor::from_region(&frame, &FaceRegion::new(0, 0, 2, 2), 8);
        assert_eq!(result, Err(FrameError::NotColor { index: 3 }));
    }

    #[test]
    fn test_batched_shape() {
        let frame = solid_frame(10, 10, [0, 0, 0, 255]);
        let tensor = InputTensor::from_region(&frame, &FaceRegion::new(0, 0, 10, 10), 48).unwrap();
        assert_eq!(tensor.to_batched().shape(), &[1, 48, 48, 3]);
    }
}
