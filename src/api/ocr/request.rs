// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::vision::ocr::EngineChoice;

/// Name of the multipart field carrying the page
pub const FILE_FIELD: &str = "file";

fn default_language() -> String {
    "lat".to_string()
}

fn default_engine() -> String {
    "auto".to_string()
}

/// Query parameters of an OCR request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrQuery {
    /// Language code (lat, grc, heb, ara)
    #[serde(default = "default_language")]
    pub language: String,

    /// Engine: auto, kraken or tesseract
    #[serde(default = "default_engine")]
    pub engine: String,
}

impl Default for OcrQuery {
    fn default() -> Self {
        Self {
            language: default_language(),
            engine: default_engine(),
        }
    }
}

impl OcrQuery {
    /// Parse the requested engine
    pub fn engine_choice(&self) -> Result<EngineChoice, ApiError> {
        self.engine
            .parse::<EngineChoice>()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    /// Language with surrounding whitespace removed, defaulting when blank
    pub fn language(&self) -> String {
        let language = self.language.trim();
        if language.is_empty() {
            default_language()
        } else {
            language.to_string()
        }
    }
}
