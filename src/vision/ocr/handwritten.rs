// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Handwritten-text engine adapter (Kraken)
//!
//! Pipeline: Sauvola binarization → projection-profile line segmentation →
//! recognition of all lines in one backend call with the model registered
//! for the requested language. Manuscripts, papyri and other degraded material go here.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use image::GrayImage;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::alto;
use super::backend::{self, BackendError};
use super::binarization::{binarize, SauvolaParams};
use super::engine::Availability;
use super::normalizer::EngineOutput;
use super::segmentation::{crop_line, segment_lines, SegmentationParams};
use crate::vision::model_registry::{ModelRegistry, RecognitionModel};
use crate::vision::preprocessing::PreprocessedImage;

/// Confidence reported when the recognizer gives no per-character scores
pub const DEFAULT_CONFIDENCE: f32 = 0.85;

/// Recognized text of one line
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrediction {
    pub text: String,
    /// Per-character confidences, when the recognizer reports them
    pub confidences: Option<Vec<f32>>,
}

impl LinePrediction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidences: None,
        }
    }

    pub fn with_confidences(text: impl Into<String>, confidences: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            confidences: Some(confidences),
        }
    }
}

/// Recognizes the cropped, binarized lines of one page with a given model
///
/// A page goes to the backend in a single call so the model loads once.
/// Predictions are returned one per line, in input order.
#[cfg_attr(test, mockall::automock)]
pub trait LineRecognizer: Send + Sync {
    fn recognize_lines(
        &self,
        model: &RecognitionModel,
        lines: &[GrayImage],
    ) -> Result<Vec<LinePrediction>, BackendError>;
}

/// Line recognizer backed by the `kraken` command-line tool
#[derive(Debug, Clone)]
pub struct KrakenCli {
    program: PathBuf,
}

impl KrakenCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate the executable; `None` when it is not installed
    pub fn detect(program: impl Into<PathBuf>) -> Option<Self> {
        let program = program.into();
        match backend::find_program(&program) {
            Some(path) => {
                info!("✅ Kraken found at {}", path.display());
                Some(Self::new(path))
            }
            None => {
                warn!("⚠️ Kraken executable '{}' not found", program.display());
                None
            }
        }
    }
}

impl LineRecognizer for KrakenCli {
    fn recognize_lines(
        &self,
        model: &RecognitionModel,
        lines: &[GrayImage],
    ) -> Result<Vec<LinePrediction>, BackendError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let inputs = lines
            .iter()
            .map(backend::write_temp_png)
            .collect::<Result<Vec<_>, _>>()?;
        let output_dir = tempfile::Builder::new()
            .prefix("philologica-")
            .tempdir()
            .map_err(|e| BackendError::TempImage(e.to_string()))?;
        let outputs: Vec<PathBuf> = (0..lines.len())
            .map(|i| output_dir.path().join(format!("line-{:04}.xml", i)))
            .collect();

        // Lines are already binarized and cropped: recognition only, each
        // input read as a single line, ALTO output for glyph confidences.
        let mut command = Command::new(&self.program);
        command.arg("-a");
        for (input, output) in inputs.iter().zip(&outputs) {
            command.arg("-i").arg(input.path()).arg(output);
        }
        command
            .arg("ocr")
            .arg("-m")
            .arg(&model.path)
            .arg("--no-segmentation");
        backend::run_command(&mut command)?;

        outputs
            .iter()
            .map(|path| {
                let xml = std::fs::read_to_string(path).map_err(|e| {
                    BackendError::MalformedOutput(format!("{}: {}", path.display(), e))
                })?;
                alto::parse_line(&xml)
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum HandwrittenError {
    #[error("Kraken not installed")]
    NotInstalled,

    #[error("Kraken model not available for language '{0}'")]
    ModelUnavailable(String),

    #[error("Kraken error: {0}")]
    Backend(#[from] BackendError),
}

/// Adapter for the manuscript-oriented engine
#[derive(Clone)]
pub struct HandwrittenAdapter {
    registry: Arc<ModelRegistry>,
    recognizer: Option<Arc<dyn LineRecognizer>>,
    binarization: SauvolaParams,
    segmentation: SegmentationParams,
}

impl fmt::Debug for HandwrittenAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandwrittenAdapter")
            .field("models", &self.registry.model_names())
            .field("installed", &self.recognizer.is_some())
            .field("binarization", &self.binarization)
            .field("segmentation", &self.segmentation)
            .finish()
    }
}

impl HandwrittenAdapter {
    /// # Arguments
    /// * `registry` - Loaded recognition models, shared read-only
    /// * `recognizer` - Line recognizer; `None` when the backend is not installed
    pub fn new(registry: Arc<ModelRegistry>, recognizer: Option<Arc<dyn LineRecognizer>>) -> Self {
        Self {
            registry,
            recognizer,
            binarization: SauvolaParams::default(),
            segmentation: SegmentationParams::default(),
        }
    }

    pub fn with_binarization(mut self, params: SauvolaParams) -> Self {
        self.binarization = params;
        self
    }

    pub fn with_segmentation(mut self, params: SegmentationParams) -> Self {
        self.segmentation = params;
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Whether the backend is installed, regardless of models
    pub fn is_installed(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Whether the adapter can serve `language`
    pub fn availability(&self, language: &str) -> Availability {
        if self.recognizer.is_none() {
            return Availability::Unavailable(HandwrittenError::NotInstalled.to_string());
        }
        if self.registry.model_for_language(language).is_none() {
            return Availability::Unavailable(
                HandwrittenError::ModelUnavailable(language.to_string()).to_string(),
            );
        }
        Availability::Available
    }

    /// Run the line pipeline and return raw per-line predictions
    pub fn predict(
        &self,
        image: &PreprocessedImage,
        language: &str,
    ) -> Result<Vec<LinePrediction>, HandwrittenError> {
        let recognizer = self
            .recognizer
            .as_ref()
            .ok_or(HandwrittenError::NotInstalled)?;
        let model = self
            .registry
            .model_for_language(language)
            .ok_or_else(|| HandwrittenError::ModelUnavailable(language.to_string()))?;

        let binary = binarize(image.as_gray(), self.binarization);
        let regions = segment_lines(&binary, self.segmentation);
        debug!(
            "Segmented {} line(s) from {}x{} page, model {}",
            regions.len(),
            image.width(),
            image.height(),
            model.name
        );

        let crops: Vec<GrayImage> = regions.iter().map(|region| crop_line(&binary, region)).collect();
        if crops.is_empty() {
            return Ok(Vec::new());
        }

        let predictions = recognizer.recognize_lines(&model, &crops)?;
        if predictions.len() != crops.len() {
            return Err(BackendError::MalformedOutput(format!(
                "expected {} line predictions, got {}",
                crops.len(),
                predictions.len()
            ))
            .into());
        }
        Ok(predictions)
    }

    /// Recognize a page; never fails
    ///
    /// Unavailability yields empty text with zero confidence, a backend
    /// failure yields the error message as text with zero confidence.
    pub fn recognize(&self, image: &PreprocessedImage, language: &str) -> EngineOutput {
        match self.predict(image, language) {
            Ok(predictions) => aggregate(&predictions),
            Err(e @ (HandwrittenError::NotInstalled | HandwrittenError::ModelUnavailable(_))) => {
                warn!("Handwritten engine unavailable: {}", e);
                EngineOutput::unavailable()
            }
            Err(e) => {
                warn!("Handwritten recognition failed: {}", e);
                EngineOutput::new(e.to_string(), 0.0)
            }
        }
    }
}

/// Join line predictions and average every per-character confidence
///
/// Falls back to `DEFAULT_CONFIDENCE` when no line reported confidences.
pub fn aggregate(predictions: &[LinePrediction]) -> EngineOutput {
    let text = predictions
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let confidences: Vec<f32> = predictions
        .iter()
        .filter_map(|p| p.confidences.as_deref())
        .flatten()
        .copied()
        .collect();

    let confidence = if confidences.is_empty() {
        DEFAULT_CONFIDENCE
    } else {
        confidences.iter().sum::<f32>() / confidences.len() as f32
    };

    EngineOutput::new(text, confidence)
}
