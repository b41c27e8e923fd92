// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR response types

use serde::Serialize;

use crate::vision::ocr::RecognitionResult;

/// Recognition result plus upload metadata
#[derive(Debug, Clone, Serialize)]
pub struct OcrResponse {
    #[serde(flatten)]
    pub result: RecognitionResult,
    /// Filename as uploaded
    pub filename: String,
    /// Upload size in bytes
    pub file_size: usize,
}

impl OcrResponse {
    pub fn new(result: RecognitionResult, filename: impl Into<String>, file_size: usize) -> Self {
        Self {
            result,
            filename: filename.into(),
            file_size,
        }
    }
}
