// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Printed-text engine adapter (Tesseract)

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use image::GrayImage;
use tracing::{debug, info, warn};

use super::backend::{self, BackendError};
use super::engine::Availability;
use super::normalizer::EngineOutput;
use crate::vision::preprocessing::PreprocessedImage;

/// Confidence reported when no word carries a usable confidence
pub const DEFAULT_CONFIDENCE: f32 = 0.7;

/// Backend language used when the requested one has no mapping
pub const DEFAULT_LANGUAGE: &str = "lat";

/// Backend language codes the adapter maps to directly
pub const SUPPORTED_LANGUAGES: &[&str] = &["lat", "grc", "heb", "ara"];

/// Message returned as text when the backend is not installed
pub const NOT_INSTALLED_MESSAGE: &str = "Tesseract not installed";

/// One recognized word as reported by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct WordBox {
    pub text: String,
    /// Line index within the page
    pub line_num: u32,
    /// Confidence on a 0-100 scale; -1 or 0 mean "not available"
    pub conf: f32,
}

impl WordBox {
    pub fn new(text: impl Into<String>, line_num: u32, conf: f32) -> Self {
        Self {
            text: text.into(),
            line_num,
            conf,
        }
    }
}

/// Word-level recognition backend
#[cfg_attr(test, mockall::automock)]
pub trait PrintedBackend: Send + Sync {
    /// Recognize words, in the order the backend reports them
    fn image_to_data(&self, image: &GrayImage, language: &str) -> Result<Vec<WordBox>, BackendError>;
}

/// Backend running the `tesseract` command-line tool with TSV output
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
}

impl TesseractCli {
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
                info!("✅ Tesseract found at {}", path.display());
                Some(Self::new(path))
            }
            None => {
                warn!("⚠️ Tesseract executable '{}' not found", program.display());
                None
            }
        }
    }
}

impl PrintedBackend for TesseractCli {
    fn image_to_data(&self, image: &GrayImage, language: &str) -> Result<Vec<WordBox>, BackendError> {
        let input = backend::write_temp_png(image)?;
        let tsv = backend::run_command(
            Command::new(&self.program)
                .arg(input.path())
                .arg("stdout")
                .arg("-l")
                .arg(language)
                .arg("--oem")
                .arg("3")
                .arg("--psm")
                .arg("6")
                .arg("-c")
                .arg("preserve_interword_spaces=1")
                .arg("tsv"),
        )?;
        parse_tsv(&tsv)
    }
}

/// Parse Tesseract TSV output into word boxes
///
/// Only word-level rows (level 5) are kept. Column layout:
/// `level page_num block_num par_num line_num word_num left top width height conf text`
pub fn parse_tsv(tsv: &str) -> Result<Vec<WordBox>, BackendError> {
    let mut lines = tsv.lines();
    match lines.next() {
        Some(header) if header.starts_with("level") => {}
        Some(other) => {
            return Err(BackendError::MalformedOutput(format!(
                "unexpected TSV header: {}",
                other
            )))
        }
        None => return Ok(Vec::new()),
    }

    let mut words = Vec::new();
    for row in lines {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let line_num = cols[4].parse().unwrap_or(0);
        let conf = cols[10].parse().unwrap_or(-1.0);
        words.push(WordBox::new(cols[11], line_num, conf));
    }
    Ok(words)
}

/// Map a requested language code to the nearest backend code
pub fn map_language(language: &str) -> &'static str {
    let language = language.trim().to_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|code| **code == language)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Build page text and confidence from word boxes
///
/// Words are grouped by line index in ascending order, keeping backend order
/// inside each line. Only confidences strictly above zero are averaged.
pub fn assemble(words: &[WordBox]) -> EngineOutput {
    let mut lines: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    let mut confidences = Vec::new();

    for word in words {
        let text = word.text.trim();
        if text.is_empty() {
            continue;
        }
        lines.entry(word.line_num).or_default().push(text);
        confidences.push(word.conf);
    }

    let text = lines
        .values()
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    let valid: Vec<f32> = confidences.into_iter().filter(|c| *c > 0.0).collect();
    let confidence = if valid.is_empty() {
        DEFAULT_CONFIDENCE
    } else {
        valid.iter().sum::<f32>() / valid.len() as f32 / 100.0
    };

    EngineOutput::new(text, confidence)
}

/// Adapter for the print-oriented engine
#[derive(Clone)]
pub struct PrintedAdapter {
    backend: Option<Arc<dyn PrintedBackend>>,
}

impl fmt::Debug for PrintedAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintedAdapter")
            .field("installed", &self.backend.is_some())
            .finish()
    }
}

impl PrintedAdapter {
    /// `backend` is `None` when the engine is not installed
    pub fn new(backend: Option<Arc<dyn PrintedBackend>>) -> Self {
        Self { backend }
    }

    pub fn availability(&self) -> Availability {
        match self.backend {
            Some(_) => Availability::Available,
            None => Availability::Unavailable(NOT_INSTALLED_MESSAGE.to_string()),
        }
    }

    /// Recognize a page; never fails
    ///
    /// Backend failures come back as `"Tesseract error: ..."` text with zero
    /// confidence.
    pub fn recognize(&self, image: &PreprocessedImage, language: &str) -> EngineOutput {
        let Some(backend) = self.backend.as_ref() else {
            warn!("Printed engine requested but not installed");
            return EngineOutput::new(NOT_INSTALLED_MESSAGE, 0.0);
        };

        let backend_language = map_language(language);
        debug!(
            "Printed recognition of {}x{} page, language {} -> {}",
            image.width(),
            image.height(),
            language,
            backend_language
        );

        match backend.image_to_data(image.as_gray(), backend_language) {
            Ok(words) => assemble(&words),
            Err(e) => {
                warn!("Printed recognition failed: {}", e);
                EngineOutput::new(format!("Tesseract error: {}", e), 0.0)
            }
        }
    }
}
