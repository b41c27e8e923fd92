// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Engine and language introspection endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::http_server::AppState;
use crate::vision::ocr::{EngineKind, SUPPORTED_LANGUAGES};

/// Status of the handwritten engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandwrittenEngineStatus {
    pub available: bool,
    pub specialization: String,
    /// Names of the loaded recognition models
    pub models: Vec<String>,
}

/// Status of the printed engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintedEngineStatus {
    pub available: bool,
    pub specialization: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnginesResponse {
    pub kraken: HandwrittenEngineStatus,
    pub tesseract: PrintedEngineStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub tesseract: Vec<String>,
    pub kraken: Vec<String>,
    /// Suggested engine per kind of material
    pub recommended: BTreeMap<String, String>,
}

/// GET /api/engines - Availability, specialization and models of each engine
pub async fn engines_handler(State(state): State<AppState>) -> Json<EnginesResponse> {
    let handwritten = state.pipeline.handwritten();
    let printed = state.pipeline.printed();

    Json(EnginesResponse {
        kraken: HandwrittenEngineStatus {
            available: handwritten.is_installed(),
            specialization: EngineKind::Handwritten.specialization().to_string(),
            models: handwritten.registry().model_names(),
        },
        tesseract: PrintedEngineStatus {
            available: printed.availability().is_available(),
            specialization: EngineKind::Printed.specialization().to_string(),
            languages: SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        },
    })
}

/// GET /api/languages - Languages per engine and recommendations
pub async fn languages_handler(State(state): State<AppState>) -> Json<LanguagesResponse> {
    let recommended = [
        ("manuscripts", "kraken"),
        ("printed_latin", "tesseract:lat"),
        ("greek_papyri", "tesseract:grc"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Json(LanguagesResponse {
        tesseract: SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        kraken: state.pipeline.handwritten().registry().model_names(),
        recommended,
    })
}
