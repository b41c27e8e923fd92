// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload validation, format sniffing and decoding of scanned pages

use std::fmt;
use std::path::Path;

use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use serde::Serialize;
use thiserror::Error;

/// File extensions accepted for recognition (lowercase, with leading dot)
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".tiff", ".tif", ".bmp"];

/// Custom error types for image intake
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported format '{extension}'. Use: {}", ALLOWED_EXTENSIONS.join(", "))]
    UnsupportedExtension { extension: String },

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Color mode of a decoded page, named after the conventional PIL mode strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorMode {
    #[serde(rename = "L")]
    Luma,
    #[serde(rename = "LA")]
    LumaAlpha,
    #[serde(rename = "RGB")]
    Rgb,
    #[serde(rename = "RGBA")]
    Rgba,
    #[serde(rename = "I;16")]
    Luma16,
    #[serde(rename = "other")]
    Other,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Luma => "L",
            ColorMode::LumaAlpha => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::Luma16 => "I;16",
            ColorMode::Other => "other",
        }
    }

    /// Whether the mode already has a single channel
    pub fn is_single_channel(&self) -> bool {
        matches!(self, ColorMode::Luma | ColorMode::Luma16)
    }
}

impl From<ColorType> for ColorMode {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::L8 => ColorMode::Luma,
            ColorType::La8 | ColorType::La16 => ColorMode::LumaAlpha,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            ColorType::L16 => ColorMode::Luma16,
            _ => ColorMode::Other,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate the extension of an uploaded filename
///
/// Runs before the upload body is read or decoded.
///
/// # Returns
/// * `Ok(String)` - The normalized extension (lowercase, leading dot)
/// * `Err(ImageError::UnsupportedExtension)` - If the extension is not accepted
pub fn check_extension(filename: &str) -> Result<String, ImageError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(ImageError::UnsupportedExtension { extension })
    }
}

/// Upload bytes plus the format sniffed from their magic bytes
#[derive(Debug, Clone)]
pub struct RawImage {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl RawImage {
    /// Wrap raw upload bytes, sniffing the container format
    pub fn new(bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::EmptyData);
        }
        let format = detect_format(&bytes)?;
        Ok(Self { bytes, format })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode into pixels; the raw buffer is consumed
    pub fn decode(self) -> Result<DecodedImage, ImageError> {
        let pixels = image::load_from_memory_with_format(&self.bytes, self.format)
            .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;
        Ok(DecodedImage::new(pixels))
    }
}

/// A decoded page in whatever color mode the upload carried
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: DynamicImage,
    mode: ColorMode,
}

impl DecodedImage {
    pub fn new(pixels: DynamicImage) -> Self {
        let mode = ColorMode::from(pixels.color());
        Self { pixels, mode }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

/// Decode raw image bytes (for multipart uploads)
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    RawImage::new(bytes.to_vec())?.decode()
}

/// Detect image format from magic bytes
///
/// Only the formats accepted for recognition are recognised.
///
/// # Returns
/// * `Ok(ImageFormat)` - Detected format
/// * `Err(ImageError::UnsupportedFormat)` - If format cannot be detected
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}
