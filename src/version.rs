// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Philologica OCR service

/// Service name reported by the API
pub const SERVICE_NAME: &str = "Philologica";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "auto-engine-selection",
    "kraken-handwritten",
    "tesseract-printed",
    "sauvola-binarization",
    "engine-fallback",
    "recognition-timeout",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} OCR {}", SERVICE_NAME, VERSION_NUMBER)
}
