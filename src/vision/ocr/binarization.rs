// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Adaptive binarization for degraded manuscript scans
//!
//! Implements Sauvola thresholding: each pixel is compared against a local
//! threshold `mean * (1 + k * (stddev / R - 1))` computed over a square
//! window. Local statistics come from integral images so the cost does not
//! depend on the window size. Stained or unevenly lit parchment keeps its
//! strokes where a single global threshold would wash them out.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image, sum_image_pixels};

/// Ink (foreground) pixel value in a binarized page
pub const INK: u8 = 0;

/// Background pixel value in a binarized page
pub const PAPER: u8 = 255;

/// Sauvola parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SauvolaParams {
    /// Side of the square window in pixels (odd)
    pub window: u32,
    /// Sensitivity to local contrast
    pub k: f64,
    /// Dynamic range of the standard deviation
    pub r: f64,
}

impl Default for SauvolaParams {
    fn default() -> Self {
        Self {
            window: 31,
            k: 0.34,
            r: 128.0,
        }
    }
}

/// Binarize a grayscale page into pure `INK`/`PAPER` pixels
pub fn binarize(image: &GrayImage, params: SauvolaParams) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    // Tables are one pixel larger than the page, with a leading zero row and column
    let sum: ImageBuffer<Luma<u64>, Vec<u64>> = integral_image(image);
    let sum_sq: ImageBuffer<Luma<u64>, Vec<u64>> = integral_squared_image(image);
    let half = params.window.max(1) / 2;

    GrayImage::from_fn(width, height, |x, y| {
        // Inclusive window bounds, clipped to the page
        let left = x.saturating_sub(half);
        let top = y.saturating_sub(half);
        let right = (x + half).min(width - 1);
        let bottom = (y + half).min(height - 1);
        let area = ((right - left + 1) as f64) * ((bottom - top + 1) as f64);

        let window_sum = sum_image_pixels(&sum, left, top, right, bottom)[0] as f64;
        let window_sq = sum_image_pixels(&sum_sq, left, top, right, bottom)[0] as f64;

        let mean = window_sum / area;
        let variance = (window_sq / area - mean * mean).max(0.0);
        let threshold = mean * (1.0 + params.k * (variance.sqrt() / params.r - 1.0));

        let value = image.get_pixel(x, y).0[0] as f64;
        Luma([if value > threshold { PAPER } else { INK }])
    })
}
