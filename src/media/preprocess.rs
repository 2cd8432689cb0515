// SPDX-License-Identifier: MPL-2.0
//! Frame preprocessing for image classifiers.
//!
//! This module provides functionality for:
//! - Converting borrowed camera frames (packed or NV12) to RGB images
//! - Fitting images to the model input size (squash, crop or letterbox)
//! - Building NCHW/NHWC `f32` tensors in the model's pixel scale

use crate::application::port::InferenceError;
use crate::domain::classification::ModelDimensions;
use crate::domain::frame::{Frame, PixelFormat};
use image_rs::{imageops, DynamicImage, Rgb, RgbImage};
use ndarray::Array4;
use serde::{Deserialize, Serialize};

/// Filter used for every resize.
const RESIZE_FILTER: imageops::FilterType = imageops::FilterType::Triangle;

/// How a frame of the wrong size is fitted to the model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeMode {
    /// Stretch to the exact input size, ignoring aspect ratio.
    #[default]
    Squash,
    /// Scale until the shorter side fits, then crop the centre.
    FitShortest,
    /// Scale until the longer side fits, then pad with black (letterbox).
    FitLongest,
}

/// Memory order of the input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[batch, channels, height, width]`
    #[default]
    Nchw,
    /// `[batch, height, width, channels]`
    Nhwc,
}

/// Numeric range of input pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelScale {
    /// `0.0..=1.0`
    #[default]
    Unit,
    /// `0.0..=255.0`
    Byte,
}

impl PixelScale {
    #[inline]
    fn apply(self, value: u8) -> f32 {
        match self {
            PixelScale::Unit => f32::from(value) / 255.0,
            PixelScale::Byte => f32::from(value),
        }
    }
}

/// Converts frames into model input tensors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preprocessor {
    pub dimensions: ModelDimensions,
    pub resize_mode: ResizeMode,
    pub layout: TensorLayout,
    pub scale: PixelScale,
}

impl Preprocessor {
    /// Validates, converts, fits and tensorizes a frame.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::InvalidFrame`] for empty or malformed frames.
    pub fn prepare(&self, frame: &Frame<'_>) -> Result<Array4<f32>, InferenceError> {
        let rgb = frame_to_rgb(frame)?;
        let fitted = fit_to_input(rgb, self.dimensions, self.resize_mode);
        Ok(image_to_tensor(&fitted, self.layout, self.scale))
    }
}

/// Converts a frame to an owned RGB image. The frame is only read.
///
/// # Errors
///
/// Returns [`InferenceError::InvalidFrame`] if the frame fails validation.
pub fn frame_to_rgb(frame: &Frame<'_>) -> Result<RgbImage, InferenceError> {
    InferenceError::check_frame(frame)?;

    let (width, height) = (frame.width(), frame.height());
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);

    for y in 0..height {
        let row = frame.row(y);
        match frame.format() {
            PixelFormat::Bgra8 => {
                for px in row.chunks_exact(4) {
                    pixels.extend_from_slice(&[px[2], px[1], px[0]]);
                }
            }
            PixelFormat::Rgba8 => {
                for px in row.chunks_exact(4) {
                    pixels.extend_from_slice(&px[..3]);
                }
            }
            PixelFormat::Rgb8 => pixels.extend_from_slice(row),
            PixelFormat::Gray8 => {
                for &v in row {
                    pixels.extend_from_slice(&[v, v, v]);
                }
            }
            PixelFormat::Nv12 => {
                let chroma = frame.chroma_row(y);
                for (x, &luma) in row.iter().enumerate() {
                    let pair = (x / 2) * 2;
                    pixels.extend_from_slice(&yuv_to_rgb(luma, chroma[pair], chroma[pair + 1]));
                }
            }
        }
    }

    RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        InferenceError::Preprocessing(format!("could not assemble {width}x{height} RGB image"))
    })
}

/// BT.601 video-range YCbCr to RGB.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = i32::from(y) - 16;
    let d = i32::from(u) - 128;
    let e = i32::from(v) - 128;
    let clamp = |value: i32| (value >> 8).clamp(0, 255) as u8;
    [
        clamp(298 * c + 409 * e + 128),
        clamp(298 * c - 100 * d - 208 * e + 128),
        clamp(298 * c + 516 * d + 128),
    ]
}

/// Fits an image to the model input size. Matching images pass through.
#[must_use]
pub fn fit_to_input(image: RgbImage, dimensions: ModelDimensions, mode: ResizeMode) -> RgbImage {
    let (width, height) = (dimensions.width(), dimensions.height());
    if image.dimensions() == (width, height) {
        return image;
    }

    let image = DynamicImage::ImageRgb8(image);
    match mode {
        ResizeMode::Squash => image.resize_exact(width, height, RESIZE_FILTER).to_rgb8(),
        ResizeMode::FitShortest => image.resize_to_fill(width, height, RESIZE_FILTER).to_rgb8(),
        ResizeMode::FitLongest => {
            let scaled = image.resize(width, height, RESIZE_FILTER).to_rgb8();
            let mut canvas = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
            let x_offset = (width - scaled.width()) / 2;
            let y_offset = (height - scaled.height()) / 2;
            imageops::overlay(
                &mut canvas,
                &scaled,
                i64::from(x_offset),
                i64::from(y_offset),
            );
            canvas
        }
    }
}

/// Builds a batch-of-one tensor from an RGB image.
#[must_use]
pub fn image_to_tensor(image: &RgbImage, layout: TensorLayout, scale: PixelScale) -> Array4<f32> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut tensor = match layout {
        TensorLayout::Nchw => Array4::<f32>::zeros((1, 3, height, width)),
        TensorLayout::Nhwc => Array4::<f32>::zeros((1, height, width, 3)),
    };

    for (x, y, pixel) in image.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for (c, &value) in pixel.0.iter().enumerate() {
            let index = match layout {
                TensorLayout::Nchw => [0, c, y, x],
                TensorLayout::Nhwc => [0, y, x, c],
            };
            tensor[index] = scale.apply(value);
        }
    }

    tensor
}

/// A uniform mid-gray frame of the given size, used to validate models.
#[must_use]
pub fn neutral_gray_pixels(dimensions: ModelDimensions) -> Vec<u8> {
    vec![128u8; dimensions.pixel_count() * 3]
}
