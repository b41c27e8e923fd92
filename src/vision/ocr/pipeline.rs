// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end recognition of one uploaded page
//!
//! decode → preprocess → select → recognize → normalize. Every step is
//! synchronous; callers on an async runtime should run [`OcrPipeline::process`]
//! on a blocking thread.

use std::time::Instant;

use thiserror::Error;
use tracing::info;

use super::engine::{Availability, EngineChoice, EngineKind};
use super::handwritten::HandwrittenAdapter;
use super::normalizer::{normalize, EngineOutput, RecognitionResult};
use super::printed::PrintedAdapter;
use super::selector::EngineSelector;
use crate::vision::image_utils::{DecodedImage, ImageError, RawImage};
use crate::vision::preprocessing::{preprocess, PreprocessedImage};

/// Errors that abort a recognition request
///
/// Engine-local failures never show up here; they are folded into the
/// result text by the adapters.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Adapter chosen for a request
#[derive(Debug, Clone, Copy)]
pub enum SelectedEngine<'a> {
    Handwritten(&'a HandwrittenAdapter),
    Printed(&'a PrintedAdapter),
}

impl SelectedEngine<'_> {
    pub fn kind(&self) -> EngineKind {
        match self {
            SelectedEngine::Handwritten(_) => EngineKind::Handwritten,
            SelectedEngine::Printed(_) => EngineKind::Printed,
        }
    }

    pub fn recognize(&self, image: &PreprocessedImage, language: &str) -> EngineOutput {
        match self {
            SelectedEngine::Handwritten(adapter) => adapter.recognize(image, language),
            SelectedEngine::Printed(adapter) => adapter.recognize(image, language),
        }
    }
}

/// Selector plus both adapters, shared across requests
#[derive(Debug, Clone)]
pub struct OcrPipeline {
    selector: EngineSelector,
    handwritten: HandwrittenAdapter,
    printed: PrintedAdapter,
}

impl OcrPipeline {
    pub fn new(selector: EngineSelector, handwritten: HandwrittenAdapter, printed: PrintedAdapter) -> Self {
        Self {
            selector,
            handwritten,
            printed,
        }
    }

    pub fn handwritten(&self) -> &HandwrittenAdapter {
        &self.handwritten
    }

    pub fn printed(&self) -> &PrintedAdapter {
        &self.printed
    }

    /// Availability of every engine, handwritten judged for `language`
    pub fn availability(&self, language: &str) -> Vec<(EngineKind, Availability)> {
        vec![
            (EngineKind::Handwritten, self.handwritten.availability(language)),
            (EngineKind::Printed, self.printed.availability()),
        ]
    }

    /// Pick the adapter for a preprocessed page
    pub fn select(&self, image: &PreprocessedImage, requested: EngineChoice, language: &str) -> SelectedEngine<'_> {
        let handwritten_available = self.handwritten.availability(language).is_available();
        match self
            .selector
            .resolve(image.width(), image.height(), requested, handwritten_available)
        {
            EngineKind::Handwritten => SelectedEngine::Handwritten(&self.handwritten),
            EngineKind::Printed => SelectedEngine::Printed(&self.printed),
        }
    }

    /// Recognize uploaded bytes
    ///
    /// Fails only when the bytes are not a decodable JPEG, PNG, TIFF or BMP.
    pub fn process(
        &self,
        bytes: Vec<u8>,
        requested: EngineChoice,
        language: &str,
    ) -> Result<RecognitionResult, PipelineError> {
        let decoded = RawImage::new(bytes)?.decode()?;
        Ok(self.process_decoded(&decoded, requested, language))
    }

    /// Recognize an already decoded page
    pub fn process_decoded(
        &self,
        image: &DecodedImage,
        requested: EngineChoice,
        language: &str,
    ) -> RecognitionResult {
        let start = Instant::now();
        let page = preprocess(image);
        let engine = self.select(&page, requested, language);
        let output = engine.recognize(&page, language);
        let result = normalize(output, engine.kind(), &page, language);

        info!(
            requested = %requested,
            engine_used = %engine.kind(),
            language = language,
            dimensions = %result.metadata().dimensions,
            source_mode = %page.source_mode(),
            confidence = result.confidence(),
            success = result.success(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recognition finished"
        );
        result
    }
}
