//! Image preprocessing for the embedding model.
//!
//! The embedder takes one batched image of a fixed size with pixel values
//! mapped from `[0, 255]` to roughly `[-1, 1]`.

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;
use serde::{Deserialize, Serialize};

/// Half of the 8-bit intensity range.
pub const PIXEL_MIDPOINT: f32 = 127.5;

/// Default FaceNet input size.
pub const DEFAULT_INPUT_SIZE: u32 = 160;

/// Memory layout of the input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, H, W, 3]`, the TFLite / Keras FaceNet convention.
    #[default]
    Nhwc,
    /// `[1, 3, H, W]`.
    Nchw,
}

/// Shape contract of the embedder input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub width: u32,
    pub height: u32,
    pub layout: TensorLayout,
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_INPUT_SIZE,
            height: DEFAULT_INPUT_SIZE,
            layout: TensorLayout::Nhwc,
        }
    }
}

impl InputSpec {
    pub fn shape(&self) -> [usize; 4] {
        let (w, h) = (self.width as usize, self.height as usize);
        match self.layout {
            TensorLayout::Nhwc => [1, h, w, 3],
            TensorLayout::Nchw => [1, 3, h, w],
        }
    }
}

#[inline]
pub fn normalize_pixel(value: u8) -> f32 {
    (value as f32 - PIXEL_MIDPOINT) / PIXEL_MIDPOINT
}

/// Resize to the model input size and normalize into a batch of one.
///
/// The resize ignores aspect ratio; the model was evaluated on stretched
/// inputs and the distortion is kept. Calling this twice on raw pixel data
/// is not idempotent.
pub fn preprocess(img: &DynamicImage, spec: &InputSpec) -> Array4<f32> {
    let resized = img.resize_exact(spec.width, spec.height, FilterType::Triangle);
    let rgb = resized.to_rgb8();
    let (w, h) = (spec.width as usize, spec.height as usize);
    let pixels = rgb.as_raw();

    let dims = spec.shape();
    let mut tensor = Array4::<f32>::zeros((dims[0], dims[1], dims[2], dims[3]));

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) * 3;
            for c in 0..3 {
                let v = normalize_pixel(pixels[idx + c]);
                match spec.layout {
                    TensorLayout::Nhwc => tensor[[0, y, x, c]] = v,
                    TensorLayout::Nchw => tensor[[0, c, y, x]] = v,
                }
            }
        }
    }

    tensor
}
