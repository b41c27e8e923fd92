// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Line segmentation of binarized pages
//!
//! Uses the horizontal projection profile: rows with enough ink pixels form
//! bands, each band is one text line.

use image::{GenericImageView, GrayImage};

use super::binarization::INK;

/// Segmentation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationParams {
    /// Minimum share of a row's pixels that must be ink for the row to count
    pub min_row_ink_ratio: f32,
    /// Bands thinner than this are treated as noise
    pub min_line_height: u32,
    /// Vertical padding added around each band
    pub padding: u32,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            min_row_ink_ratio: 0.01,
            min_line_height: 3,
            padding: 2,
        }
    }
}

/// A rectangular text line region, top to bottom reading order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Split a binarized page into line regions
pub fn segment_lines(binary: &GrayImage, params: SegmentationParams) -> Vec<LineRegion> {
    let (width, height) = binary.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let min_ink = ((width as f32 * params.min_row_ink_ratio).ceil() as u32).max(1);
    let profile: Vec<bool> = (0..height)
        .map(|y| (0..width).filter(|&x| is_ink(binary, x, y)).count() as u32 >= min_ink)
        .collect();

    let mut regions = Vec::new();
    let mut start: Option<u32> = None;
    for y in 0..=height {
        let inked = y < height && profile[y as usize];
        match (start, inked) {
            (None, true) => start = Some(y),
            (Some(top), false) => {
                if y - top >= params.min_line_height {
                    if let Some(region) = band_region(binary, top, y, params.padding) {
                        regions.push(region);
                    }
                }
                start = None;
            }
            _ => {}
        }
    }
    regions
}

/// Crop a band horizontally to its ink extent and pad it vertically
fn band_region(binary: &GrayImage, top: u32, bottom: u32, padding: u32) -> Option<LineRegion> {
    let (width, height) = binary.dimensions();
    let columns: Vec<u32> = (0..width)
        .filter(|&x| (top..bottom).any(|y| is_ink(binary, x, y)))
        .collect();
    let left = *columns.first()?;
    let right = *columns.last()?;

    let y = top.saturating_sub(padding);
    let bottom = (bottom + padding).min(height);
    Some(LineRegion {
        x: left,
        y,
        width: right - left + 1,
        height: bottom - y,
    })
}

/// Copy a line region out of a page
pub fn crop_line(image: &GrayImage, region: &LineRegion) -> GrayImage {
    image
        .view(region.x, region.y, region.width, region.height)
        .to_image()
}

fn is_ink(binary: &GrayImage, x: u32, y: u32) -> bool {
    binary.get_pixel(x, y).0[0] == INK
}
