// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for scanned historical documents
//!
//! This module provides:
//! - Upload validation and decoding
//! - Page preprocessing (grayscale, contrast, sharpness)
//! - The handwritten model registry
//! - OCR engine selection and recognition

pub mod image_utils;
pub mod model_registry;
pub mod ocr;
pub mod preprocessing;

pub use image_utils::{check_extension, decode_image_bytes, detect_format, ColorMode, DecodedImage, ImageError, RawImage};
pub use model_registry::{ModelRegistry, RecognitionModel};
pub use preprocessing::{preprocess, PreprocessedImage};
