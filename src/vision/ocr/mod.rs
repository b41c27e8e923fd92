// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR orchestration for historical documents
//!
//! Components:
//! - `selector` - Resolves the requested engine to the one that runs
//! - `handwritten` - Manuscript engine: binarize, segment lines, recognize the lines in one call
//! - `alto` - Parses the ALTO lines written by the manuscript backend
//! - `printed` - Print engine: word boxes grouped into lines
//! - `normalizer` - Canonical result shared by both engines
//! - `pipeline` - Ties decoding, preprocessing and the engines together

pub mod alto;
pub mod backend;
pub mod binarization;
pub mod engine;
pub mod handwritten;
pub mod normalizer;
pub mod pipeline;
pub mod printed;
pub mod segmentation;
pub mod selector;

pub use backend::BackendError;
pub use engine::{Availability, EngineChoice, EngineKind, ParseEngineError};
pub use handwritten::{HandwrittenAdapter, KrakenCli, LinePrediction, LineRecognizer};
pub use normalizer::{normalize, EngineOutput, RecognitionResult, ResultMetadata};
pub use pipeline::{OcrPipeline, PipelineError, SelectedEngine};
pub use printed::{PrintedAdapter, PrintedBackend, TesseractCli, WordBox, SUPPORTED_LANGUAGES};
pub use selector::{AspectRatioPolicy, EngineSelector, SelectionPolicy};
