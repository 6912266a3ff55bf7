// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Image preprocessing for MoveNet inference.
//!
//! MoveNet takes an NHWC tensor of unnormalized RGB values. The image is
//! stretched (no letterboxing) to a square input, so normalized model outputs
//! map directly back onto the original image axes.

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GenericImageView};
use ndarray::Array4;

use crate::error::{InferenceError, Result};

/// Element type of the model input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// `int32` input, as exported from TensorFlow Hub.
    #[default]
    Int32,
    /// `float32` input holding values in 0..=255.
    Float32,
}

/// Input tensor data in the element type the model expects.
#[derive(Debug, Clone)]
pub enum TensorData {
    /// 32-bit integer tensor.
    Int32(Array4<i32>),
    /// 32-bit floating point tensor.
    Float32(Array4<f32>),
}

impl TensorData {
    /// Get the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Int32(t) => t.shape(),
            Self::Float32(t) => t.shape(),
        }
    }
}

/// Result of preprocessing an image.
#[derive(Debug, Clone)]
pub struct PreprocessResult {
    /// Preprocessed image tensor in NHWC format.
    pub tensor: TensorData,
    /// Original image dimensions (height, width).
    pub orig_shape: (u32, u32),
}

impl PreprocessResult {
    /// Model input dimensions (height, width).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn input_shape(&self) -> (u32, u32) {
        let shape = self.tensor.shape();
        (shape[1] as u32, shape[2] as u32)
    }
}

/// Preprocess an image for MoveNet inference.
///
/// Resizes to `input_size x input_size` with bilinear filtering and packs the
/// pixels into a `[1, input_size, input_size, 3]` tensor. For `Int32` input the
/// resized values are truncated, matching a float-to-int cast.
///
/// # Errors
///
/// Returns an error if the image has a zero dimension or resizing fails.
pub fn preprocess_image(
    image: &DynamicImage,
    input_size: usize,
    input_type: InputType,
) -> Result<PreprocessResult> {
    let (orig_width, orig_height) = image.dimensions();
    if orig_width == 0 || orig_height == 0 {
        return Err(InferenceError::InvalidDimensions {
            width: orig_width,
            height: orig_height,
        });
    }
    if input_size == 0 {
        return Err(InferenceError::ConfigError(
            "Model input size must be positive".to_string(),
        ));
    }

    let resized = resize_rgb(image, input_size)?;

    let tensor = match input_type {
        InputType::Int32 => TensorData::Int32(
            Array4::from_shape_vec(
                (1, input_size, input_size, 3),
                resized.into_iter().map(i32::from).collect(),
            )
            .map_err(|e| InferenceError::ImageError(format!("Failed to build input tensor: {e}")))?,
        ),
        InputType::Float32 => TensorData::Float32(
            Array4::from_shape_vec(
                (1, input_size, input_size, 3),
                resized.into_iter().map(f32::from).collect(),
            )
            .map_err(|e| InferenceError::ImageError(format!("Failed to build input tensor: {e}")))?,
        ),
    };

    Ok(PreprocessResult {
        tensor,
        orig_shape: (orig_height, orig_width),
    })
}

/// Bilinear resize to a square RGB8 buffer.
#[allow(clippy::cast_possible_truncation)]
fn resize_rgb(image: &DynamicImage, size: usize) -> Result<Vec<u8>> {
    let (src_w, src_h) = image.dimensions();
    let src_rgb = image.to_rgb8();
    let src_image = Image::from_vec_u8(src_w, src_h, src_rgb.into_raw(), PixelType::U8x3)
        .map_err(|e| InferenceError::ImageError(format!("Failed to create source image: {e}")))?;

    let size = size as u32;
    let mut dst_image = Image::new(size, size, PixelType::U8x3);

    let mut resizer = Resizer::new();
    let options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| InferenceError::ImageError(format!("Failed to resize image: {e}")))?;

    Ok(dst_image.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid_image(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_int32_tensor_shape() {
        let img = solid_image(640, 480, [10, 20, 30]);
        let result = preprocess_image(&img, 192, InputType::Int32).unwrap();

        assert_eq!(result.tensor.shape(), &[1, 192, 192, 3]);
        assert_eq!(result.orig_shape, (480, 640));
        assert_eq!(result.input_shape(), (192, 192));
    }

    #[test]
    fn test_solid_color_preserved() {
        let img = solid_image(100, 50, [10, 20, 30]);
        let result = preprocess_image(&img, 64, InputType::Int32).unwrap();

        let TensorData::Int32(tensor) = result.tensor else {
            panic!("expected int32 tensor");
        };
        assert_eq!(tensor[[0, 10, 10, 0]], 10);
        assert_eq!(tensor[[0, 10, 10, 1]], 20);
        assert_eq!(tensor[[0, 63, 63, 2]], 30);
    }

    #[test]
    fn test_float32_tensor_is_unnormalized() {
        let img = solid_image(32, 32, [255, 0, 128]);
        let result = preprocess_image(&img, 32, InputType::Float32).unwrap();

        let TensorData::Float32(tensor) = result.tensor else {
            panic!("expected float32 tensor");
        };
        assert!((tensor[[0, 0, 0, 0]] - 255.0).abs() < f32::EPSILON);
        assert!((tensor[[0, 0, 0, 2]] - 128.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_input_size_rejected() {
        let img = solid_image(8, 8, [0, 0, 0]);
        let err = preprocess_image(&img, 0, InputType::Int32).unwrap_err();
        assert!(matches!(err, InferenceError::ConfigError(_)));
    }
}
