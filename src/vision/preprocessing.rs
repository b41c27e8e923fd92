// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page preprocessing shared by both recognition engines
//!
//! Every page is reduced to 8-bit grayscale, then its contrast and sharpness
//! are enhanced by fixed factors. The transform is pure: identical input
//! pixels always produce identical output pixels.

use image::{DynamicImage, GrayImage, Luma};

use super::image_utils::{ColorMode, DecodedImage};

/// Contrast enhancement factor
pub const CONTRAST_FACTOR: f32 = 1.5;

/// Sharpness enhancement factor
pub const SHARPNESS_FACTOR: f32 = 1.2;

/// 3x3 smoothing kernel used as the blur reference for sharpening
const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];
const SMOOTH_SCALE: f32 = 13.0;

/// A single-channel page ready for recognition
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedImage {
    gray: GrayImage,
    source_mode: ColorMode,
}

impl PreprocessedImage {
    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    /// Always `L`; recognition never sees a multi-channel page
    pub fn mode(&self) -> ColorMode {
        ColorMode::Luma
    }

    /// Mode of the upload before grayscale reduction
    pub fn source_mode(&self) -> ColorMode {
        self.source_mode
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn into_gray(self) -> GrayImage {
        self.gray
    }
}

impl From<GrayImage> for PreprocessedImage {
    fn from(gray: GrayImage) -> Self {
        Self {
            gray,
            source_mode: ColorMode::Luma,
        }
    }
}

/// Preprocess a decoded page for recognition
///
/// Steps:
/// 1. Reduce to 8-bit grayscale (ITU-R 601-2 luma, alpha discarded)
/// 2. Enhance contrast by `CONTRAST_FACTOR` around the mean intensity
/// 3. Enhance sharpness by `SHARPNESS_FACTOR` against a smoothed copy
pub fn preprocess(image: &DecodedImage) -> PreprocessedImage {
    let gray = to_grayscale(image.pixels());
    let gray = enhance_contrast(&gray, CONTRAST_FACTOR);
    let gray = enhance_sharpness(&gray, SHARPNESS_FACTOR);

    PreprocessedImage {
        gray,
        source_mode: image.mode(),
    }
}

/// Convert any decoded image to 8-bit grayscale
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLumaA16(_) => image.to_luma8(),
        _ => {
            let rgb = image.to_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                let luma = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
                Luma([luma.min(255) as u8])
            })
        }
    }
}

/// Scale each pixel's distance from the mean intensity by `factor`
pub fn enhance_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let mean = mean_intensity(image);
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        pixel.0[0] = blend(mean, pixel.0[0] as f32, factor);
    }
    output
}

/// Scale each pixel's distance from its smoothed value by `factor`
///
/// Border pixels have no full neighbourhood and keep their value as the
/// smoothing reference.
pub fn enhance_sharpness(image: &GrayImage, factor: f32) -> GrayImage {
    let smoothed = smooth(image);
    let mut output = image.clone();
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let reference = smoothed.get_pixel(x, y).0[0] as f32;
        pixel.0[0] = blend(reference, pixel.0[0] as f32, factor);
    }
    output
}

fn smooth(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut output = image.clone();
    if width < 3 || height < 3 {
        return output;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = 0.0f32;
            for (i, weight) in SMOOTH_KERNEL.iter().enumerate() {
                let kx = x + (i as u32 % 3) - 1;
                let ky = y + (i as u32 / 3) - 1;
                acc += weight * image.get_pixel(kx, ky).0[0] as f32;
            }
            output.put_pixel(x, y, Luma([clamp_u8(acc / SMOOTH_SCALE)]));
        }
    }
    output
}

fn mean_intensity(image: &GrayImage) -> f32 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = image.pixels().map(|p| p.0[0] as u64).sum();
    (sum as f64 / count as f64 + 0.5).floor() as f32
}

/// `reference + factor * (value - reference)`, rounded and clamped
fn blend(reference: f32, value: f32, factor: f32) -> u8 {
    clamp_u8(reference + factor * (value - reference))
}

fn clamp_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
