// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Canonical recognition result shared by both engines

use serde::Serialize;

use super::engine::EngineKind;
use crate::vision::preprocessing::PreprocessedImage;

/// Text and aggregated confidence produced by an engine adapter
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub text: String,
    /// Confidence in 0.0-1.0
    pub confidence: f32,
}

impl EngineOutput {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    /// Output of an engine that could not run: no text, zero confidence
    pub fn unavailable() -> Self {
        Self::new(String::new(), 0.0)
    }
}

/// Image and request metadata attached to every result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMetadata {
    /// `WIDTHxHEIGHT` of the recognized page
    pub dimensions: String,
    /// Color mode of the recognized page
    pub mode: String,
    /// Engine that actually ran
    pub engine_used: EngineKind,
    pub language_requested: String,
}

/// Result of one recognition request
///
/// Fields are private so a result can only come out of [`normalize`], which
/// enforces `success == !text.trim().is_empty()` and a confidence in 0.0-1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionResult {
    text: String,
    confidence: f32,
    engine_used: EngineKind,
    metadata: ResultMetadata,
    success: bool,
}

impl RecognitionResult {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn engine_used(&self) -> EngineKind {
        self.engine_used
    }

    pub fn metadata(&self) -> &ResultMetadata {
        &self.metadata
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Lines of recognized text, in reading order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Build the canonical result for an engine's output
pub fn normalize(
    output: EngineOutput,
    engine_used: EngineKind,
    image: &PreprocessedImage,
    language_requested: &str,
) -> RecognitionResult {
    let confidence = if output.confidence.is_nan() {
        0.0
    } else {
        output.confidence.clamp(0.0, 1.0)
    };
    let success = !output.text.trim().is_empty();

    RecognitionResult {
        text: output.text,
        confidence,
        engine_used,
        metadata: ResultMetadata {
            dimensions: format!("{}x{}", image.width(), image.height()),
            mode: image.mode().to_string(),
            engine_used,
            language_requested: language_requested.to_string(),
        },
        success,
    }
}
